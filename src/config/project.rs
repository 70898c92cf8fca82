use crate::homography::homography_from_rows;
use crate::io::background_image_size;
use crate::projector::{ParallelOptions, ProjectorOptions, TableFields};
use crate::types::ImageSize;
use nalgebra::Matrix3;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Row-major 3x3 transform, as produced by the calibration step.
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub image_size: ImageSize,
    /// Image the projected points will be drawn on. When set, its pixel size
    /// replaces `image_size`.
    #[serde(default)]
    pub background_image: Option<PathBuf>,
    #[serde(default)]
    pub parallel: ParallelOptions,
    #[serde(default = "default_progress_step")]
    pub progress_step_percent: usize,
    pub input: InputConfig,
    pub output: PathBuf,
}

fn default_progress_step() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputConfig {
    /// JSON array of `[x, y]` pairs.
    Points { path: PathBuf },
    /// JSON array of objects.
    Table {
        path: PathBuf,
        x_field: String,
        y_field: String,
        #[serde(default)]
        out_x_field: Option<String>,
        #[serde(default)]
        out_y_field: Option<String>,
    },
}

impl InputConfig {
    pub fn path(&self) -> &Path {
        match self {
            InputConfig::Points { path } | InputConfig::Table { path, .. } => path,
        }
    }

    /// Field names for table input, `None` for point input.
    pub fn table_fields(&self) -> Option<TableFields> {
        match self {
            InputConfig::Points { .. } => None,
            InputConfig::Table {
                x_field,
                y_field,
                out_x_field,
                out_y_field,
                ..
            } => {
                let mut fields = TableFields::new(x_field.clone(), y_field.clone());
                if let Some(out_x) = out_x_field {
                    fields.out_x = out_x.clone();
                }
                if let Some(out_y) = out_y_field {
                    fields.out_y = out_y.clone();
                }
                Some(fields)
            }
        }
    }
}

impl ProjectConfig {
    pub fn homography(&self) -> Result<Matrix3<f64>, String> {
        homography_from_rows(&self.matrix).map_err(|e| format!("Invalid matrix: {e}"))
    }

    /// Target size, taken from the background image when one is configured.
    pub fn resolve_image_size(&self) -> Result<ImageSize, String> {
        match &self.background_image {
            Some(path) => background_image_size(path),
            None => Ok(self.image_size),
        }
    }

    pub fn projector_options(&self) -> Result<ProjectorOptions, String> {
        Ok(ProjectorOptions::default()
            .with_image_size(self.resolve_image_size()?)
            .with_parallel(self.parallel))
    }
}

pub fn load_config(path: &Path) -> Result<ProjectConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(data: &str) -> Result<ProjectConfig, serde_json::Error> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_config_with_defaults() {
        let cfg = parse_config(
            r#"{
                "matrix": [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
                "input": { "kind": "table", "path": "rows.json", "x_field": "px", "y_field": "py" },
                "output": "out.json"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.image_size, ImageSize::DEFAULT);
        assert_eq!(cfg.progress_step_percent, 10);
        assert_eq!(cfg.homography().unwrap(), Matrix3::identity());
        let fields = cfg.input.table_fields().unwrap();
        assert_eq!(fields, TableFields::new("px", "py"));
        assert_eq!(cfg.input.path(), Path::new("rows.json"));
        assert_eq!(cfg.projector_options().unwrap().image_height(), 4096.0);
    }

    #[test]
    fn points_config_with_explicit_size() {
        let cfg = parse_config(
            r#"{
                "matrix": [[2, 0, 0], [0, 2, 0], [0, 0, 1]],
                "image_size": { "width": 1920, "height": 1080 },
                "input": { "kind": "points", "path": "pts.json" },
                "output": "out.json"
            }"#,
        )
        .unwrap();
        assert!(cfg.input.table_fields().is_none());
        assert_eq!(cfg.resolve_image_size().unwrap(), ImageSize::new(1920, 1080));
    }

    #[test]
    fn custom_output_fields() {
        let cfg = parse_config(
            r#"{
                "matrix": [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
                "input": { "kind": "table", "path": "t.json", "x_field": "u", "y_field": "v",
                           "out_x_field": "map_x", "out_y_field": "map_y" },
                "output": "o.json"
            }"#,
        )
        .unwrap();
        let fields = cfg.input.table_fields().unwrap();
        assert_eq!((fields.out_x.as_str(), fields.out_y.as_str()), ("map_x", "map_y"));
    }

    #[test]
    fn malformed_matrix_is_reported() {
        let cfg = parse_config(
            r#"{
                "matrix": [[1, 0], [0, 1]],
                "input": { "kind": "points", "path": "p.json" },
                "output": "o.json"
            }"#,
        )
        .unwrap();
        let err = cfg.homography().unwrap_err();
        assert!(err.contains("3x3"), "{err}");
    }
}
