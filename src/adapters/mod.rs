mod adb_cli_input_relay;
mod adb_server_bridge;
mod arboard_clipboard;

pub use adb_cli_input_relay::AdbCliInputRelay;
pub use adb_server_bridge::AdbServerBridge;
pub use arboard_clipboard::ArboardClipboard;
