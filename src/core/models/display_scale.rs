use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("scale '{0}' is not a number")]
    NotANumber(String),
    #[error("scale must be a positive finite number, got {0}")]
    OutOfRange(f64),
}

/// Factor between device pixels and on-screen pixels, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale(f64);

impl DisplayScale {
    pub const IDENTITY: DisplayScale = DisplayScale(1.0);

    pub fn new(factor: f64) -> Result<Self, ScaleError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ScaleError::OutOfRange(factor));
        }
        Ok(Self(factor))
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0 == 1.0
    }

    /// Device length to display length, never below one pixel.
    pub fn scale_length(&self, device_length: u32) -> u32 {
        let scaled = (device_length as f64 * self.0).round();
        scaled.clamp(1.0, u32::MAX as f64) as u32
    }

    /// Display coordinate back to device coordinate.
    pub fn to_device_coordinate(&self, display_coordinate: f32) -> i32 {
        (display_coordinate as f64 / self.0).round() as i32
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromStr for DisplayScale {
    type Err = ScaleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let factor: f64 = value
            .trim()
            .parse()
            .map_err(|_| ScaleError::NotANumber(value.to_string()))?;
        Self::new(factor)
    }
}

impl std::fmt::Display for DisplayScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
