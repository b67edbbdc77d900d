mod adapters;
mod app;
mod core;
mod global_constants;
mod presentation;
mod startup;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::adapters::AdbServerBridge;
use crate::app::{ScreenCaptureApp, SessionConfig};
use crate::core::models::{DisplayScale, UserSettings};
use crate::global_constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, DEVICE_LIST_MAX_POLLS,
    DEVICE_LIST_POLL_INTERVAL_MS, LOG_TAG_MAIN, MESSAGE_SESSION_FINISHED,
    MESSAGE_TAKING_SCREENSHOT,
};
use crate::startup::{DeviceListPolling, StartupError};

#[derive(Parser, Debug)]
#[command(name = "device-screen-capture")]
#[command(version, about = "Capture, save and drive the screen of an attached Android device")]
struct Cli {
    /// Display scale applied to the captured screen
    #[arg(long, short = 's', value_name = "FACTOR", default_value_t = DisplayScale::IDENTITY)]
    scale: DisplayScale,

    /// Directory containing the adb executable
    #[arg(long, value_name = "DIR")]
    adb_dir: Option<PathBuf>,

    /// Port of the ADB server
    #[arg(long, value_name = "PORT")]
    adb_port: Option<u16>,

    /// Directory screenshots are saved into
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut UserSettings) {
        if let Some(adb_dir) = &self.adb_dir {
            settings.adb_directory = Some(adb_dir.clone());
        }
        if let Some(adb_port) = self.adb_port {
            settings.adb_server_port = adb_port;
        }
        if let Some(save_dir) = &self.save_dir {
            settings.save_directory = save_dir.clone();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("{} Starting with {:?}", LOG_TAG_MAIN, cli);

    let mut settings = UserSettings::load().unwrap_or_else(|e| {
        log::warn!("{} Failed to load settings: {}, using defaults", LOG_TAG_MAIN, e);
        UserSettings::default()
    });
    cli.apply_overrides(&mut settings);

    let bridge = Arc::new(AdbServerBridge::initialize(
        &settings.adb_server_host,
        settings.adb_server_port,
        Duration::from_millis(settings.bridge_timeout_ms),
    ));

    let polling = DeviceListPolling {
        interval: Duration::from_millis(DEVICE_LIST_POLL_INTERVAL_MS),
        max_polls: DEVICE_LIST_MAX_POLLS,
    };
    let device = match startup::wait_for_device_list(
        bridge.as_ref(),
        &settings.adb_program(),
        polling,
    )
    .and_then(startup::select_single_device)
    {
        Ok(device) => device,
        Err(error) => {
            if let StartupError::MultipleDevices(count) = &error {
                log::error!("{} {} devices attached", LOG_TAG_MAIN, count);
            }
            log::error!("{} Startup failed: {:?}", LOG_TAG_MAIN, error);
            println!("{}", error);
            std::process::exit(1);
        }
    };

    println!("{} {}", MESSAGE_TAKING_SCREENSHOT, device.serial);

    let config = SessionConfig {
        bridge,
        device,
        scale: cli.scale,
        settings,
    };

    iced::application(
        move || ScreenCaptureApp::build(config.clone()),
        ScreenCaptureApp::handle_update,
        ScreenCaptureApp::render_view,
    )
    .title(ScreenCaptureApp::get_title)
    .theme(ScreenCaptureApp::get_theme)
    .window_size((DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT))
    .run()?;

    println!("{}", MESSAGE_SESSION_FINISHED);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_defaults_to_identity() {
        let cli = Cli::try_parse_from(["device-screen-capture"]).unwrap();

        assert!(cli.scale.is_identity());
    }

    #[test]
    fn test_short_scale_flag_is_parsed() {
        let cli = Cli::try_parse_from(["device-screen-capture", "-s", "0.5"]).unwrap();

        assert_eq!(cli.scale.factor(), 0.5);
    }

    #[test]
    fn test_invalid_scale_is_a_usage_error() {
        for bad in ["abc", "0", "-2", "NaN"] {
            let result = Cli::try_parse_from(["device-screen-capture", "--scale", bad]);

            assert!(result.is_err(), "scale {:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_cli_values_override_settings() {
        let cli = Cli::try_parse_from([
            "device-screen-capture",
            "--adb-dir",
            "/opt/platform-tools",
            "--adb-port",
            "5038",
            "--save-dir",
            "/tmp/shots",
        ])
        .unwrap();
        let mut settings = UserSettings::default();

        cli.apply_overrides(&mut settings);

        assert_eq!(settings.adb_program(), PathBuf::from("/opt/platform-tools/adb"));
        assert_eq!(settings.adb_server_port, 5038);
        assert_eq!(settings.save_directory, PathBuf::from("/tmp/shots"));
    }

    #[test]
    fn test_absent_flags_keep_settings() {
        let cli = Cli::try_parse_from(["device-screen-capture"]).unwrap();
        let mut settings = UserSettings::default();
        let before = settings.clone();

        cli.apply_overrides(&mut settings);

        assert_eq!(settings, before);
    }
}
