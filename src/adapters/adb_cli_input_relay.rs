use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::core::interfaces::ports::InputRelay;
use crate::core::models::DeviceInputEvent;
use crate::global_constants::LOG_TAG_RELAY;

/// Forwards input by running `adb -s <serial> shell input ...`.
pub struct AdbCliInputRelay {
    adb_program: PathBuf,
    serial: String,
}

impl AdbCliInputRelay {
    pub fn initialize(adb_program: PathBuf, serial: &str) -> Self {
        log::debug!(
            "{} relaying input through {:?} for {}",
            LOG_TAG_RELAY,
            adb_program,
            serial
        );
        Self {
            adb_program,
            serial: serial.to_string(),
        }
    }

    pub fn build_command_args(&self, event: &DeviceInputEvent) -> Vec<String> {
        let mut args = vec!["-s".to_string(), self.serial.clone()];
        args.extend(event.shell_input_args());
        args
    }
}

impl InputRelay for AdbCliInputRelay {
    fn relay(&self, event: &DeviceInputEvent) -> Result<()> {
        let args = self.build_command_args(event);
        let command_line = format!("{} {}", self.adb_program.display(), args.join(" "));

        let status = Command::new(&self.adb_program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .with_context(|| format!("failed to run `{}`", command_line))?;

        // exit status is reported, not acted on
        log::info!("{} Process[{}] exit status: {}", LOG_TAG_RELAY, command_line, status);
        Ok(())
    }
}
