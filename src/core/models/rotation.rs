use super::RawCapture;

/// Clockwise quarter turns applied to the displayed capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_quarter_turns(turns: u32) -> Self {
        match turns % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn quarter_turns(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(&self) -> u32 {
        self.quarter_turns() * 90
    }

    pub fn next_clockwise(&self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    /// Applies the whole rotation in a single pass over the pixels.
    pub fn apply_to(&self, capture: &RawCapture) -> RawCapture {
        let (width, height) = (capture.width, capture.height);

        match self {
            Rotation::Deg0 => capture.clone(),
            Rotation::Deg90 => capture.rotated_clockwise(),
            Rotation::Deg180 => {
                capture.remap_pixels(width, height, |x, y| (width - 1 - x, height - 1 - y))
            }
            Rotation::Deg270 => capture.remap_pixels(height, width, |x, y| (width - 1 - y, x)),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
