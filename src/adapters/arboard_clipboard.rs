use std::borrow::Cow;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

use crate::core::interfaces::ports::ImageClipboard;
use crate::core::models::DisplayedImage;
use crate::global_constants::LOG_TAG_CLIPBOARD;

/// System clipboard, opened on first copy and held for the session.
pub struct ArboardClipboard {
    clipboard: Mutex<Option<arboard::Clipboard>>,
}

impl ArboardClipboard {
    pub fn initialize() -> Self {
        log::debug!("{} using system clipboard", LOG_TAG_CLIPBOARD);
        Self {
            clipboard: Mutex::new(None),
        }
    }
}

impl ImageClipboard for ArboardClipboard {
    fn copy_image(&self, image: &DisplayedImage) -> Result<()> {
        let rgba = image.to_rgba();
        let image_data = arboard::ImageData {
            width: image.width as usize,
            height: image.height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };

        let mut slot = self
            .clipboard
            .lock()
            .map_err(|_| anyhow!("clipboard lock poisoned"))?;
        if slot.is_none() {
            *slot = Some(arboard::Clipboard::new().context("clipboard unavailable")?);
        }
        let clipboard = slot
            .as_mut()
            .ok_or_else(|| anyhow!("clipboard unavailable"))?;

        clipboard
            .set_image(image_data)
            .context("clipboard rejected image")?;

        log::debug!(
            "{} placed {}x{} image on clipboard",
            LOG_TAG_CLIPBOARD,
            image.width,
            image.height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_open(clipboard: &ArboardClipboard) -> bool {
        clipboard.clipboard.lock().unwrap().is_some()
    }

    fn tiny_image() -> DisplayedImage {
        DisplayedImage::build_from_rgb(image::RgbImage::from_pixel(2, 2, image::Rgb([9, 8, 7])))
    }

    #[test]
    fn test_clipboard_starts_closed() {
        assert!(!is_open(&ArboardClipboard::initialize()));
    }

    #[test]
    fn test_successful_copy_keeps_clipboard_open() {
        let clipboard = ArboardClipboard::initialize();

        if clipboard.copy_image(&tiny_image()).is_err() {
            // headless runs have no clipboard to open
            return;
        }
        assert!(is_open(&clipboard));

        assert!(clipboard.copy_image(&tiny_image()).is_ok());
        assert!(is_open(&clipboard));
    }
}
