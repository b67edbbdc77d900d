use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CaptureFormatError {
    #[error("unsupported bit depth: {0} bpp")]
    UnsupportedDepth(u32),
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("{width}x{height} at {bits_per_pixel} bpp does not fit in memory")]
    DimensionsOverflow {
        width: u32,
        height: u32,
        bits_per_pixel: u32,
    },
}

/// Bit mask selecting one color channel out of a little-endian pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMask(pub u32);

impl ChannelMask {
    pub fn from_offset_and_length(offset: u32, length: u32) -> Self {
        if length == 0 || offset >= 32 {
            return Self(0);
        }
        let bits = if length >= 32 {
            u32::MAX
        } else {
            (1u32 << length) - 1
        };
        Self(bits << offset)
    }

    /// Extracts the channel from `pixel` and widens it to 8 bits.
    pub fn extract_8bit(&self, pixel: u32) -> u8 {
        if self.0 == 0 {
            return 0;
        }
        let shift = self.0.trailing_zeros();
        let max_value = (self.0 >> shift) as u64;
        let value = ((pixel & self.0) >> shift) as u64;
        (value * 255 / max_value) as u8
    }
}

/// Immutable framebuffer snapshot as delivered by the device.
///
/// Pixels are row-major, `bpp / 8` bytes each, little-endian. The channel
/// masks address bits of that little-endian value.
#[derive(Clone, PartialEq)]
pub struct RawCapture {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub red_mask: ChannelMask,
    pub green_mask: ChannelMask,
    pub blue_mask: ChannelMask,
    data: Vec<u8>,
}

impl std::fmt::Debug for RawCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCapture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bits_per_pixel", &self.bits_per_pixel)
            .field("red_mask", &format_args!("{:#010x}", self.red_mask.0))
            .field("green_mask", &format_args!("{:#010x}", self.green_mask.0))
            .field("blue_mask", &format_args!("{:#010x}", self.blue_mask.0))
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl RawCapture {
    pub fn build_from_raw_data(
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        masks: [ChannelMask; 3],
        data: Vec<u8>,
    ) -> Result<Self, CaptureFormatError> {
        if !matches!(bits_per_pixel, 16 | 24 | 32) {
            return Err(CaptureFormatError::UnsupportedDepth(bits_per_pixel));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul((bits_per_pixel / 8) as usize))
            .ok_or(CaptureFormatError::DimensionsOverflow {
                width,
                height,
                bits_per_pixel,
            })?;
        if data.len() < expected {
            return Err(CaptureFormatError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        log::debug!(
            "[RAW_CAPTURE] building capture: {}x{}, {} bpp",
            width,
            height,
            bits_per_pixel
        );

        let [red_mask, green_mask, blue_mask] = masks;
        let mut data = data;
        data.truncate(expected);

        Ok(Self {
            width,
            height,
            bits_per_pixel,
            red_mask,
            green_mask,
            blue_mask,
            data,
        })
    }

    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }

    #[allow(dead_code)]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_at(&self, x: u32, y: u32) -> u32 {
        let bytes_per_pixel = self.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bytes_per_pixel;
        self.data[start..start + bytes_per_pixel]
            .iter()
            .rev()
            .fold(0u32, |value, byte| (value << 8) | *byte as u32)
    }

    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let pixel = self.pixel_at(x, y);
        [
            self.red_mask.extract_8bit(pixel),
            self.green_mask.extract_8bit(pixel),
            self.blue_mask.extract_8bit(pixel),
        ]
    }

    /// Copies pixels into a new capture of `width` x `height` where the
    /// destination pixel at `(x, y)` comes from `source_of(x, y)`.
    pub(crate) fn remap_pixels(
        &self,
        width: u32,
        height: u32,
        source_of: impl Fn(u32, u32) -> (u32, u32),
    ) -> Self {
        let bytes_per_pixel = self.bytes_per_pixel();
        let mut data = Vec::with_capacity(self.data.len());

        for y in 0..height {
            for x in 0..width {
                let (source_x, source_y) = source_of(x, y);
                let start =
                    (source_y as usize * self.width as usize + source_x as usize) * bytes_per_pixel;
                data.extend_from_slice(&self.data[start..start + bytes_per_pixel]);
            }
        }

        Self {
            width,
            height,
            bits_per_pixel: self.bits_per_pixel,
            red_mask: self.red_mask,
            green_mask: self.green_mask,
            blue_mask: self.blue_mask,
            data,
        }
    }

    /// Returns this capture turned 90 degrees clockwise.
    pub fn rotated_clockwise(&self) -> Self {
        let source_height = self.height;
        self.remap_pixels(self.height, self.width, |x, y| (y, source_height - 1 - x))
    }
}
