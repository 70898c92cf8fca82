#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod homography;
pub mod io;
pub mod projector;
pub mod table;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{DegenerateProjection, ProjectionError, ProjectionResult};
pub use crate::homography::{homography_from_row_slice, homography_from_rows};
pub use crate::projector::{
    transform_batch, transform_point, BatchProjection, LogProgress, NoProgress,
    ParallelOptions, ProgressObserver, Projector, ProjectorOptions, TableFields,
};
pub use crate::table::{transform_table, Record, RecordTable, TableProjection};
pub use crate::types::{ImageSize, SourcePoint, TargetPoint};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use perspective_projector::prelude::*;
/// use nalgebra::Matrix3;
///
/// let h = Matrix3::identity();
/// let p = transform_point(&h, SourcePoint::new(10.0, 20.0), 100.0).unwrap();
/// assert_eq!(p, TargetPoint::new(10.0, 80.0));
/// ```
pub mod prelude {
    pub use crate::{
        transform_batch, transform_point, transform_table, ImageSize, Projector,
        ProjectorOptions, RecordTable, SourcePoint, TableFields, TargetPoint,
    };
}
