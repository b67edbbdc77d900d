use thiserror::Error;

use crate::core::models::{CaptureFormatError, DeviceInfo, RawCapture};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("bridge timed out")]
    Timeout,

    #[error("command rejected by bridge: {0}")]
    CommandRejected(String),

    #[error("malformed bridge reply: {0}")]
    Protocol(String),
}

impl From<CaptureFormatError> for BridgeError {
    fn from(error: CaptureFormatError) -> Self {
        BridgeError::Protocol(error.to_string())
    }
}

pub trait DeviceBridge: Send + Sync {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, BridgeError>;

    fn capture_framebuffer(&self, device: &DeviceInfo) -> Result<RawCapture, BridgeError>;
}
