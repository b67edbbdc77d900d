use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::global_constants::{PNG_EXTENSION, SAVE_FILE_NAME_TEMPLATE};

/// Default name offered for a new screenshot, e.g. `device-2024-03-09-141503.png`.
pub fn default_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.{}", now.format(SAVE_FILE_NAME_TEMPLATE), PNG_EXTENSION)
}

/// Appends `.png` unless the file name already carries it.
pub fn ensure_png_extension(path: &Path) -> PathBuf {
    let has_png_extension = path
        .extension()
        .map(|extension| extension.eq_ignore_ascii_case(PNG_EXTENSION))
        .unwrap_or(false);

    if has_png_extension {
        return path.to_path_buf();
    }

    let mut with_extension = path.as_os_str().to_os_string();
    with_extension.push(".");
    with_extension.push(PNG_EXTENSION);
    PathBuf::from(with_extension)
}

/// Resolves what the user typed in the file name field against the save directory.
pub fn resolve_save_path(save_directory: &Path, file_name: &str) -> PathBuf {
    let typed = Path::new(file_name.trim());
    let joined = if typed.is_absolute() {
        typed.to_path_buf()
    } else {
        save_directory.join(typed)
    };
    ensure_png_extension(&joined)
}
