use serde::{Deserialize, Serialize};

/// Pixel coordinates in the source image (origin top-left, y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcePoint {
    pub x: f64,
    pub y: f64,
}

impl SourcePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for SourcePoint {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

impl From<(f64, f64)> for SourcePoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Pixel coordinates in the target image (origin bottom-left, y grows upward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    pub x: f64,
    pub y: f64,
}

impl TargetPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Size of the target image. Only `height` takes part in the projection,
/// where it anchors the vertical flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Fallback target size used when the caller does not configure one.
    /// Results are only meaningful if the target really is 4096 px tall.
    pub const DEFAULT: ImageSize = ImageSize {
        width: 4096,
        height: 4096,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}
