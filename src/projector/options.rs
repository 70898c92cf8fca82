//! Option types configuring the projector.
//!
//! The only value that changes the numbers is the target image height. The
//! remaining knobs name the table output fields and decide whether large
//! inputs are spread over the rayon pool.

use crate::types::ImageSize;
use serde::Deserialize;

/// Default field receiving the projected x coordinate in table mode.
pub const DEFAULT_OUT_X_FIELD: &str = "transformed_map_x";
/// Default field receiving the projected y coordinate in table mode.
pub const DEFAULT_OUT_Y_FIELD: &str = "transformed_map_y";

/// Field names read and written by table projection.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TableFields {
    /// Source x field. Required.
    pub x: String,
    /// Source y field. Required.
    pub y: String,
    #[serde(default = "default_out_x")]
    pub out_x: String,
    #[serde(default = "default_out_y")]
    pub out_y: String,
}

fn default_out_x() -> String {
    DEFAULT_OUT_X_FIELD.to_string()
}

fn default_out_y() -> String {
    DEFAULT_OUT_Y_FIELD.to_string()
}

impl TableFields {
    /// Read `x`/`y`, write the default output fields.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            out_x: default_out_x(),
            out_y: default_out_y(),
        }
    }

    pub fn with_output(mut self, out_x: impl Into<String>, out_y: impl Into<String>) -> Self {
        self.out_x = out_x.into();
        self.out_y = out_y.into();
        self
    }
}

/// Controls whether batch and table projection run sequentially or with Rayon.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ParallelOptions {
    enabled: bool,
    min_items_for_parallel: usize,
}

impl ParallelOptions {
    /// Construct explicit options.
    pub fn new(enabled: bool, min_items_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_items_for_parallel: min_items_for_parallel.max(1),
        }
    }

    /// Disable parallel projection regardless of input size.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_items_for_parallel: usize::MAX,
        }
    }

    /// Returns true when projecting `item_count` points should use Rayon.
    pub fn should_parallelize(&self, item_count: usize) -> bool {
        cfg!(feature = "parallel") && self.enabled && item_count >= self.min_items_for_parallel
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items_for_parallel = min_items.max(1);
        self
    }
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            min_items_for_parallel: 4096,
        }
    }
}

/// Projector-wide options.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectorOptions {
    /// Target image size; its height anchors the vertical flip.
    pub image_size: ImageSize,
    pub parallel: ParallelOptions,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self {
            image_size: ImageSize::DEFAULT,
            parallel: ParallelOptions::default(),
        }
    }
}

impl ProjectorOptions {
    pub fn with_image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelOptions) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn image_height(&self) -> f64 {
        self.image_size.height_f64()
    }
}
