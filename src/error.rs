//! Error types surfaced by the projection operations.

use thiserror::Error;

/// A point whose homogeneous scale factor vanished or whose projection left
/// the finite range.
///
/// `index` is the position of the point in its batch, or the row index in
/// table mode. Single-point calls report index 0.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("point #{index} ({x}, {y}) has homogeneous scale {w}")]
pub struct DegenerateProjection {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    /// Homogeneous scale factor `r2` computed for the point.
    pub w: f64,
}

impl DegenerateProjection {
    pub(crate) fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// Errors that can occur while projecting points or tables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// The transform matrix is not 3x3.
    #[error("transform matrix must be 3x3, got {rows}x{cols}")]
    MatrixShape { rows: usize, cols: usize },

    /// A flat matrix buffer does not hold exactly 9 values.
    #[error("transform matrix needs 9 row-major values, got {len}")]
    MatrixLen { len: usize },

    /// A point does not have exactly two coordinates.
    #[error("point must have 2 coordinates, got {len}")]
    PointShape { len: usize },

    /// A source field holds something other than a number.
    #[error("row {row}: field `{field}` is not numeric")]
    NonNumericField { row: usize, field: String },

    /// A source field is absent from a row.
    #[error("row {row}: missing field `{field}`")]
    MissingField { row: usize, field: String },

    /// Degenerate projection of a single point.
    #[error("degenerate projection: {0}")]
    Degenerate(#[from] DegenerateProjection),

    /// Degenerate projections collected over a batch or table.
    #[error("{} of {total} points have a degenerate projection", .failures.len())]
    DegenerateBatch {
        failures: Vec<DegenerateProjection>,
        total: usize,
    },
}

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_message_names_the_point() {
        let d = DegenerateProjection {
            index: 7,
            x: 1.5,
            y: 2.0,
            w: 0.0,
        };
        assert_eq!(d.to_string(), "point #7 (1.5, 2) has homogeneous scale 0");
        let err: ProjectionError = d.into();
        assert_eq!(err, ProjectionError::Degenerate(d));
        assert_eq!(
            err.to_string(),
            "degenerate projection: point #7 (1.5, 2) has homogeneous scale 0"
        );
    }
}
