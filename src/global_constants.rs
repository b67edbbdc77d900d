pub const APPLICATION_TITLE: &str = "Device Screen Capture";
pub const APPLICATION_DIRECTORY_NAME: &str = "device-screen-capture";

pub const LOG_TAG_MAIN: &str = "[MAIN]";
pub const LOG_TAG_APP: &str = "[APP]";
pub const LOG_TAG_SESSION: &str = "[SESSION]";
pub const LOG_TAG_PIPELINE: &str = "[PIPELINE]";
pub const LOG_TAG_ADB: &str = "[ADB]";
pub const LOG_TAG_RELAY: &str = "[RELAY]";
pub const LOG_TAG_CLIPBOARD: &str = "[CLIPBOARD]";
pub const LOG_TAG_STARTUP: &str = "[STARTUP]";

pub const STATUS_PREPARING: &str = "Preparing...";
pub const STATUS_CAPTURING: &str = "Capturing...";
pub const STATUS_CAPTURED: &str = "Captured image:";
pub const STATUS_UNAVAILABLE: &str = "Screen not available";

pub const MESSAGE_FRAMEBUFFER_UNAVAILABLE: &str = "Unable to get frame buffer";
pub const MESSAGE_NO_DEVICES: &str = "No devices found!";
pub const MESSAGE_MULTIPLE_DEVICES: &str = "Error: more than one emulator or device available!";
pub const MESSAGE_DEVICE_LIST_TIMEOUT: &str = "Timeout getting device list!";
pub const MESSAGE_TAKING_SCREENSHOT: &str = "Taking screenshot from:";
pub const MESSAGE_SESSION_FINISHED: &str = "Success.";

pub const ADB_EXECUTABLE_NAME: &str = "adb";
pub const DEFAULT_ADB_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_ADB_SERVER_PORT: u16 = 5037;
pub const DEFAULT_BRIDGE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_RELAY_SETTLE_DELAY_MS: u64 = 1000;

pub const DEVICE_LIST_POLL_INTERVAL_MS: u64 = 100;
pub const DEVICE_LIST_MAX_POLLS: u32 = 100;

pub const DEFAULT_WINDOW_WIDTH: f32 = 720.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 960.0;

pub const PLACEHOLDER_WIDTH: f32 = 320.0;
pub const PLACEHOLDER_HEIGHT: f32 = 240.0;

pub const SAVE_FILE_NAME_TEMPLATE: &str = "device-%Y-%m-%d-%H%M%S";
pub const PNG_EXTENSION: &str = "png";

pub const SETTINGS_FILE_NAME: &str = "settings.json";
