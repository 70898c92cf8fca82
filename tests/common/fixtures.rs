use nalgebra::Matrix3;
use perspective_projector::{Record, RecordTable, SourcePoint};
use serde_json::{json, Value};

/// Homography mapping a camera view of a plane to a top-down view, shaped
/// like the output of a 4-point perspective calibration.
pub fn camera_to_map() -> Matrix3<f64> {
    Matrix3::new(
        1.8, 0.35, -120.0, //
        0.02, 2.4, -310.0, //
        0.00004, 0.0009, 1.0,
    )
}

/// Matrix whose scale row is `x - 100`, so every point with x = 100 is degenerate.
pub fn vanishing_at_x_100() -> Matrix3<f64> {
    Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -100.0)
}

/// Regular grid of source pixels, row-major.
pub fn pixel_grid(cols: usize, rows: usize, step: f64) -> Vec<SourcePoint> {
    let mut pts = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            pts.push(SourcePoint::new(c as f64 * step, r as f64 * step));
        }
    }
    pts
}

pub fn record(v: Value) -> Record {
    match v {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {other}"),
    }
}

/// Detection-style table with source pixels in `px`/`py` and unrelated fields.
pub fn detections(n: usize) -> RecordTable {
    (0..n)
        .map(|i| {
            record(json!({
                "frame": i,
                "label": format!("player_{}", i % 7),
                "px": 150.0 + i as f64 * 11.5,
                "py": 220.0 + (i % 13) as f64 * 9.25,
                "score": 0.5 + (i % 5) as f64 * 0.1,
            }))
        })
        .collect()
}
