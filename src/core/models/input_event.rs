use iced::Point;

use super::DisplayScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Home,
    Back,
}

impl KeyCode {
    pub fn android_code(&self) -> u32 {
        match self {
            KeyCode::Home => 3,
            KeyCode::Back => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevicePoint {
    pub x: i32,
    pub y: i32,
}

impl DevicePoint {
    pub fn from_display_point(point: Point, scale: DisplayScale) -> Self {
        Self {
            x: scale.to_device_coordinate(point.x),
            y: scale.to_device_coordinate(point.y),
        }
    }
}

/// Input injected into the device through `adb shell input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceInputEvent {
    Tap(DevicePoint),
    Swipe { from: DevicePoint, to: DevicePoint },
    KeyEvent(KeyCode),
}

impl DeviceInputEvent {
    /// A press and release at the same display point is a tap, anything else a swipe.
    pub fn from_pointer_gesture(down: Point, up: Point, scale: DisplayScale) -> Self {
        if down == up {
            return DeviceInputEvent::Tap(DevicePoint::from_display_point(up, scale));
        }

        DeviceInputEvent::Swipe {
            from: DevicePoint::from_display_point(down, scale),
            to: DevicePoint::from_display_point(up, scale),
        }
    }

    pub fn shell_input_args(&self) -> Vec<String> {
        let mut args = vec!["shell".to_string(), "input".to_string()];

        match self {
            DeviceInputEvent::Tap(point) => {
                args.push("tap".to_string());
                args.push(point.x.to_string());
                args.push(point.y.to_string());
            }
            DeviceInputEvent::Swipe { from, to } => {
                args.push("swipe".to_string());
                for coordinate in [from.x, from.y, to.x, to.y] {
                    args.push(coordinate.to_string());
                }
            }
            DeviceInputEvent::KeyEvent(key) => {
                args.push("keyevent".to_string());
                args.push(key.android_code().to_string());
            }
        }

        args
    }
}
