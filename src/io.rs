//! I/O helpers for point lists, record tables and JSON output.
//!
//! - `load_points`: read a JSON array of `[x, y]` pairs.
//! - `load_record_table`: read a JSON array of objects.
//! - `background_image_size`: read the pixel size of the image results will be drawn on.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::homography::point_from_slice;
use crate::table::RecordTable;
use crate::types::{ImageSize, SourcePoint};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load source points stored as `[[x, y], ...]`.
pub fn load_points(path: &Path) -> Result<Vec<SourcePoint>, String> {
    let raw: Vec<Vec<f64>> = read_json(path)?;
    raw.iter()
        .enumerate()
        .map(|(idx, coords)| {
            point_from_slice(coords)
                .map_err(|e| format!("Invalid point #{idx} in {}: {e}", path.display()))
        })
        .collect()
}

/// Load a record table stored as `[{...}, {...}]`.
pub fn load_record_table(path: &Path) -> Result<RecordTable, String> {
    read_json(path)
}

/// Read the dimensions of an image file without decoding its pixels.
pub fn background_image_size(path: &Path) -> Result<ImageSize, String> {
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| format!("Failed to read image size of {}: {e}", path.display()))?;
    Ok(ImageSize::new(width, height))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
