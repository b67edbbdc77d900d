mod device_bridge;
mod image_clipboard;
mod input_relay;

pub use device_bridge::{BridgeError, DeviceBridge};
pub use image_clipboard::ImageClipboard;
pub use input_relay::InputRelay;
