use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Dark => write!(f, "Dark"),
            ThemeMode::Light => write!(f, "Light"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    /// Directory holding the `adb` executable; `None` means look it up on `PATH`.
    #[serde(default)]
    pub adb_directory: Option<PathBuf>,
    #[serde(default = "default_adb_server_host")]
    pub adb_server_host: String,
    #[serde(default = "default_adb_server_port")]
    pub adb_server_port: u16,
    #[serde(default = "default_save_directory")]
    pub save_directory: PathBuf,
    #[serde(default = "default_relay_settle_delay_ms")]
    pub relay_settle_delay_ms: u64,
    #[serde(default = "default_bridge_timeout_ms")]
    pub bridge_timeout_ms: u64,
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

fn default_adb_server_host() -> String {
    global_constants::DEFAULT_ADB_SERVER_HOST.to_string()
}

fn default_adb_server_port() -> u16 {
    global_constants::DEFAULT_ADB_SERVER_PORT
}

fn default_save_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_relay_settle_delay_ms() -> u64 {
    global_constants::DEFAULT_RELAY_SETTLE_DELAY_MS
}

fn default_bridge_timeout_ms() -> u64 {
    global_constants::DEFAULT_BRIDGE_TIMEOUT_MS
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            adb_directory: None,
            adb_server_host: default_adb_server_host(),
            adb_server_port: default_adb_server_port(),
            save_directory: default_save_directory(),
            relay_settle_delay_ms: default_relay_settle_delay_ms(),
            bridge_timeout_ms: default_bridge_timeout_ms(),
            theme_mode: ThemeMode::default(),
        }
    }
}

impl UserSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_file_path()?;
        Self::load_from(&settings_path)
    }

    pub fn load_from(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            default_settings.save_to(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: UserSettings = serde_json::from_str(&contents)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!(
            "[SETTINGS] ADB server: {}:{}",
            settings.adb_server_host,
            settings.adb_server_port
        );
        log::debug!("[SETTINGS] Save directory: {:?}", settings.save_directory);

        Ok(settings)
    }

    pub fn save_to(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    /// Program used for `start-server` and input relay.
    pub fn adb_program(&self) -> PathBuf {
        match &self.adb_directory {
            Some(directory) if !directory.as_os_str().is_empty() => {
                directory.join(global_constants::ADB_EXECUTABLE_NAME)
            }
            _ => PathBuf::from(global_constants::ADB_EXECUTABLE_NAME),
        }
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
