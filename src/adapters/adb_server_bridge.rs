use std::future::Future;
use std::io;
use std::time::Duration;

use forensic_adb::{AndroidStorageInput, Device, DeviceError, Host};

use crate::core::interfaces::ports::{BridgeError, DeviceBridge};
use crate::core::models::{ChannelMask, DeviceInfo, RawCapture};
use crate::global_constants::LOG_TAG_ADB;

const SCREENCAP_COMMAND: &str = "screencap";
const ONLINE_STATE: &str = "device";

const SCREENCAP_HEADER_LEN: usize = 12;
const SCREENCAP_HEADER_WITH_DATASPACE_LEN: usize = 16;

const MAX_FRAMEBUFFER_BYTES: usize = 256 * 1024 * 1024;

/// Pixel formats `screencap` emits in its raw header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreencapFormat {
    Rgba8888,
    Rgbx8888,
    Rgb888,
    Rgb565,
    Bgra8888,
}

impl ScreencapFormat {
    pub fn from_code(code: u32) -> Result<Self, BridgeError> {
        match code {
            1 => Ok(Self::Rgba8888),
            2 => Ok(Self::Rgbx8888),
            3 => Ok(Self::Rgb888),
            4 => Ok(Self::Rgb565),
            5 => Ok(Self::Bgra8888),
            other => Err(BridgeError::Protocol(format!(
                "unsupported screencap pixel format {}",
                other
            ))),
        }
    }

    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            Self::Rgba8888 | Self::Rgbx8888 | Self::Bgra8888 => 32,
            Self::Rgb888 => 24,
            Self::Rgb565 => 16,
        }
    }

    pub fn masks(&self) -> [ChannelMask; 3] {
        let (red, green, blue) = match self {
            Self::Rgba8888 | Self::Rgbx8888 | Self::Rgb888 => ((0, 8), (8, 8), (16, 8)),
            Self::Bgra8888 => ((16, 8), (8, 8), (0, 8)),
            Self::Rgb565 => ((11, 5), (5, 6), (0, 5)),
        };
        [
            ChannelMask::from_offset_and_length(red.0, red.1),
            ChannelMask::from_offset_and_length(green.0, green.1),
            ChannelMask::from_offset_and_length(blue.0, blue.1),
        ]
    }
}

/// Width, height and format words leading `screencap` raw output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreencapHeader {
    pub width: u32,
    pub height: u32,
    pub format: ScreencapFormat,
    pub header_len: usize,
}

impl ScreencapHeader {
    pub fn parse(output: &[u8]) -> Result<Self, BridgeError> {
        if output.len() < SCREENCAP_HEADER_LEN {
            return Err(BridgeError::Protocol(format!(
                "screencap output of {} bytes has no header",
                output.len()
            )));
        }

        let word = |index: usize| {
            let start = index * 4;
            u32::from_le_bytes([
                output[start],
                output[start + 1],
                output[start + 2],
                output[start + 3],
            ])
        };
        let width = word(0);
        let height = word(1);
        let format = ScreencapFormat::from_code(word(2))?;

        let pixel_bytes = pixel_byte_count(width, height, format.bits_per_pixel())?;

        // newer releases append a dataspace word
        let header_len = if output.len() >= SCREENCAP_HEADER_WITH_DATASPACE_LEN + pixel_bytes {
            SCREENCAP_HEADER_WITH_DATASPACE_LEN
        } else {
            SCREENCAP_HEADER_LEN
        };

        Ok(Self {
            width,
            height,
            format,
            header_len,
        })
    }
}

fn pixel_byte_count(width: u32, height: u32, bits_per_pixel: u32) -> Result<usize, BridgeError> {
    let size = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul((bits_per_pixel / 8) as usize))
        .ok_or_else(|| {
            BridgeError::Protocol(format!("screencap dimensions {}x{} overflow", width, height))
        })?;

    if size > MAX_FRAMEBUFFER_BYTES {
        return Err(BridgeError::Protocol(format!(
            "framebuffer of {} bytes exceeds limit",
            size
        )));
    }
    Ok(size)
}

/// Decodes `screencap` raw output into a capture.
pub fn decode_screencap(mut output: Vec<u8>) -> Result<RawCapture, BridgeError> {
    let header = ScreencapHeader::parse(&output)?;
    log::debug!("{} screencap header: {:?}", LOG_TAG_ADB, header);

    let pixels = output.split_off(header.header_len);
    let capture = RawCapture::build_from_raw_data(
        header.width,
        header.height,
        header.format.bits_per_pixel(),
        header.format.masks(),
        pixels,
    )?;
    Ok(capture)
}

/// Talks to the local ADB server through `forensic_adb`.
pub struct AdbServerBridge {
    host: String,
    port: u16,
    timeout: Duration,
}

impl AdbServerBridge {
    pub fn initialize(host: &str, port: u16, timeout: Duration) -> Self {
        log::debug!("{} bridge targets {}:{}", LOG_TAG_ADB, host, port);
        Self {
            host: host.to_string(),
            port,
            timeout,
        }
    }

    fn adb_host(&self) -> Host {
        Host {
            host: Some(self.host.clone()),
            port: Some(self.port),
        }
    }

    /// Drives one `forensic_adb` call to completion under the bridge timeout.
    fn run_blocking<T, F, Fut>(&self, operation: F) -> Result<T, BridgeError>
    where
        T: Send,
        F: FnOnce(Host) -> Fut + Send,
        Fut: Future<Output = forensic_adb::Result<T>>,
    {
        let host = self.adb_host();
        let timeout = self.timeout;

        // iced may already have a runtime entered on the calling thread
        std::thread::scope(|scope| {
            scope
                .spawn(move || {
                    let runtime = tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()?;
                    runtime.block_on(async move {
                        match tokio::time::timeout(timeout, operation(host)).await {
                            Ok(result) => result.map_err(classify_device_error),
                            Err(_) => Err(BridgeError::Timeout),
                        }
                    })
                })
                .join()
                .unwrap_or_else(|_| Err(BridgeError::Protocol("adb worker panicked".to_string())))
        })
    }
}

impl DeviceBridge for AdbServerBridge {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, BridgeError> {
        let listed: Vec<forensic_adb::DeviceInfo> =
            self.run_blocking(|host| async move { host.devices().await })?;

        let devices: Vec<DeviceInfo> = listed
            .into_iter()
            .map(|listed| DeviceInfo::new(listed.serial, ONLINE_STATE))
            .collect();
        log::debug!("{} server reports {} device(s)", LOG_TAG_ADB, devices.len());
        Ok(devices)
    }

    fn capture_framebuffer(&self, device: &DeviceInfo) -> Result<RawCapture, BridgeError> {
        let serial = device.serial.clone();
        let output = self.run_blocking(|host| async move {
            let device = Device::new(host, serial, AndroidStorageInput::default()).await?;
            device.execute_host_exec_out_command(SCREENCAP_COMMAND).await
        })?;
        log::debug!("{} screencap returned {} bytes", LOG_TAG_ADB, output.len());

        decode_screencap(output)
    }
}

fn classify_device_error(error: DeviceError) -> BridgeError {
    match error {
        DeviceError::Io(error) => classify_io_error(error),
        DeviceError::Adb(message) => BridgeError::CommandRejected(message),
        DeviceError::UnknownDevice(serial) => {
            BridgeError::CommandRejected(format!("unknown device {}", serial))
        }
        other => BridgeError::Protocol(other.to_string()),
    }
}

fn classify_io_error(error: io::Error) -> BridgeError {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => BridgeError::Timeout,
        _ => BridgeError::Io(error),
    }
}
