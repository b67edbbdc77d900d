use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use thiserror::Error;

use crate::core::interfaces::ports::{BridgeError, DeviceBridge};
use crate::core::models::DeviceInfo;
use crate::global_constants::{
    LOG_TAG_STARTUP, MESSAGE_DEVICE_LIST_TIMEOUT, MESSAGE_MULTIPLE_DEVICES, MESSAGE_NO_DEVICES,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{}", MESSAGE_NO_DEVICES)]
    NoDevices,

    #[error("{}", MESSAGE_MULTIPLE_DEVICES)]
    MultipleDevices(usize),

    #[error("{}", MESSAGE_DEVICE_LIST_TIMEOUT)]
    BridgeUnreachable(#[source] BridgeError),
}

/// How long to keep asking for the device list once the server had to be started.
#[derive(Debug, Clone, Copy)]
pub struct DeviceListPolling {
    pub interval: Duration,
    pub max_polls: u32,
}

/// Lists attached devices, starting the ADB server through `adb_program` if it
/// does not answer.
pub fn wait_for_device_list(
    bridge: &dyn DeviceBridge,
    adb_program: &Path,
    polling: DeviceListPolling,
) -> Result<Vec<DeviceInfo>, StartupError> {
    let mut last_error = match bridge.list_devices() {
        Ok(devices) => return Ok(devices),
        Err(error) => error,
    };

    log::warn!(
        "{} ADB server not reachable ({}), starting it",
        LOG_TAG_STARTUP,
        last_error
    );
    start_adb_server(adb_program);

    for attempt in 1..=polling.max_polls {
        std::thread::sleep(polling.interval);

        match bridge.list_devices() {
            Ok(devices) => {
                log::info!(
                    "{} Device list available after {} polls",
                    LOG_TAG_STARTUP,
                    attempt
                );
                return Ok(devices);
            }
            Err(error) => {
                log::debug!("{} Poll {} failed: {}", LOG_TAG_STARTUP, attempt, error);
                last_error = error;
            }
        }
    }

    Err(StartupError::BridgeUnreachable(last_error))
}

fn start_adb_server(adb_program: &Path) {
    let result = Command::new(adb_program)
        .arg("start-server")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => log::info!(
            "{} Process[{:?} start-server] exit status: {}",
            LOG_TAG_STARTUP,
            adb_program,
            status
        ),
        Err(error) => log::warn!(
            "{} Unable to run {:?} start-server: {}",
            LOG_TAG_STARTUP,
            adb_program,
            error
        ),
    }
}

pub fn select_single_device(mut devices: Vec<DeviceInfo>) -> Result<DeviceInfo, StartupError> {
    match devices.len() {
        0 => Err(StartupError::NoDevices),
        1 => {
            let device = devices.pop().ok_or(StartupError::NoDevices)?;
            if !device.is_online() {
                log::warn!(
                    "{} {} reports state '{}', captures may fail",
                    LOG_TAG_STARTUP,
                    device.serial,
                    device.state
                );
            }
            Ok(device)
        }
        count => Err(StartupError::MultipleDevices(count)),
    }
}
