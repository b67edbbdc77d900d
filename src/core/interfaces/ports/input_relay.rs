use anyhow::Result;

use crate::core::models::DeviceInputEvent;

pub trait InputRelay: Send + Sync {
    /// Blocks until the event has been handed to the device.
    fn relay(&self, event: &DeviceInputEvent) -> Result<()>;
}
