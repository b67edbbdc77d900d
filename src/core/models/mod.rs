mod device_info;
mod display_scale;
mod displayed_image;
mod input_event;
pub(crate) mod raw_capture;
mod rotation;
pub mod save_target;
mod user_settings;

pub use device_info::DeviceInfo;
pub use display_scale::DisplayScale;
pub use displayed_image::DisplayedImage;
pub use input_event::{DeviceInputEvent, DevicePoint, KeyCode};
pub use raw_capture::{CaptureFormatError, ChannelMask, RawCapture};
pub use rotation::Rotation;
pub use user_settings::{ThemeMode, UserSettings};
