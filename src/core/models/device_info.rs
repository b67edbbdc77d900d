/// One entry of the ADB server's device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub serial: String,
    pub state: String,
}

impl DeviceInfo {
    pub fn new(serial: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            state: state.into(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.state == "device"
    }
}
