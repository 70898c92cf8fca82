//! Point and batch projection, plus the [`Projector`] facade that carries
//! options and progress reporting across all three input shapes.
//!
//! Batch and table projection never stop at a degenerate point: each input
//! gets its own result and the failures are reported alongside the output.

pub mod options;
pub mod progress;

pub use options::{
    ParallelOptions, ProjectorOptions, TableFields, DEFAULT_OUT_X_FIELD, DEFAULT_OUT_Y_FIELD,
};
pub use progress::{LogProgress, NoProgress, ProgressObserver};

use crate::error::{DegenerateProjection, ProjectionError, ProjectionResult};
use crate::homography::project;
use crate::table::{project_table, RecordTable, TableProjection};
use crate::types::{SourcePoint, TargetPoint};
use log::{debug, info, warn};
use nalgebra::Matrix3;
use progress::ProgressTicker;
use std::time::Instant;

/// Project one source pixel into the bottom-origin target frame.
pub fn transform_point(
    h: &Matrix3<f64>,
    point: SourcePoint,
    image_height: f64,
) -> ProjectionResult<TargetPoint> {
    Ok(project(h, point, image_height)?)
}

/// Project every point of `points`, keeping order and length.
pub fn transform_batch(h: &Matrix3<f64>, points: &[SourcePoint], image_height: f64) -> BatchProjection {
    project_batch(h, points, image_height, ParallelOptions::default(), &NoProgress)
}

/// Outcome of a batch projection: one entry per input point, in input order.
#[derive(Clone, Debug)]
pub struct BatchProjection {
    pub results: Vec<Result<TargetPoint, DegenerateProjection>>,
    pub elapsed_ms: f64,
}

impl BatchProjection {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Degenerate points, in input order.
    pub fn failures(&self) -> Vec<DegenerateProjection> {
        self.results
            .iter()
            .filter_map(|r| r.as_ref().err().copied())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }

    /// Projected points with `None` in place of degenerate ones.
    pub fn points(&self) -> Vec<Option<TargetPoint>> {
        self.results.iter().map(|r| r.as_ref().ok().copied()).collect()
    }

    /// All projected points, or every failure if any point was degenerate.
    pub fn into_points(self) -> ProjectionResult<Vec<TargetPoint>> {
        let total = self.results.len();
        let mut points = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for r in self.results {
            match r {
                Ok(p) => points.push(p),
                Err(f) => failures.push(f),
            }
        }
        if failures.is_empty() {
            Ok(points)
        } else {
            Err(ProjectionError::DegenerateBatch { failures, total })
        }
    }
}

/// Map `items` in order, on the Rayon pool when `parallel` allows it.
pub(crate) fn map_indexed<T, U, F>(items: &[T], parallel: ParallelOptions, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(usize, &T) -> U + Sync + Send,
{
    if parallel.should_parallelize(items.len()) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            debug!("Projecting {} items on the rayon pool", items.len());
            return items.par_iter().enumerate().map(|(i, t)| f(i, t)).collect();
        }
    }
    items.iter().enumerate().map(|(i, t)| f(i, t)).collect()
}

pub(crate) fn project_batch(
    h: &Matrix3<f64>,
    points: &[SourcePoint],
    image_height: f64,
    parallel: ParallelOptions,
    observer: &dyn ProgressObserver,
) -> BatchProjection {
    let start = Instant::now();
    let ticker = ProgressTicker::start(observer, points.len());
    let results = map_indexed(points, parallel, |i, &p| {
        let r = project(h, p, image_height).map_err(|d| d.at(i));
        ticker.tick();
        r
    });
    ticker.finish();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let batch = BatchProjection {
        results,
        elapsed_ms,
    };
    let failures = batch.failures();
    for f in &failures {
        warn!("Degenerate projection: {f}");
    }
    info!(
        "Projected {} points ({} degenerate) in {:.3} ms",
        batch.len(),
        failures.len(),
        elapsed_ms
    );
    batch
}

/// Projection entry point bound to one matrix and a set of options.
///
/// ```
/// use nalgebra::Matrix3;
/// use perspective_projector::{ImageSize, Projector, ProjectorOptions, SourcePoint};
///
/// let h = Matrix3::identity();
/// let projector = Projector::new(&h, ProjectorOptions::default().with_image_size(ImageSize::new(200, 100)));
/// let p = projector.point(SourcePoint::new(10.0, 20.0)).unwrap();
/// assert_eq!((p.x, p.y), (10.0, 80.0));
/// ```
#[derive(Clone, Debug)]
pub struct Projector<'m> {
    h: &'m Matrix3<f64>,
    options: ProjectorOptions,
}

impl<'m> Projector<'m> {
    pub fn new(h: &'m Matrix3<f64>, options: ProjectorOptions) -> Self {
        Self { h, options }
    }

    pub fn options(&self) -> &ProjectorOptions {
        &self.options
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        self.h
    }

    pub fn point(&self, point: SourcePoint) -> ProjectionResult<TargetPoint> {
        transform_point(self.h, point, self.options.image_height())
    }

    pub fn batch(&self, points: &[SourcePoint]) -> BatchProjection {
        self.batch_with_progress(points, &NoProgress)
    }

    pub fn batch_with_progress(
        &self,
        points: &[SourcePoint],
        observer: &dyn ProgressObserver,
    ) -> BatchProjection {
        project_batch(
            self.h,
            points,
            self.options.image_height(),
            self.options.parallel,
            observer,
        )
    }

    pub fn table(
        &self,
        table: &RecordTable,
        fields: &TableFields,
    ) -> ProjectionResult<TableProjection> {
        self.table_with_progress(table, fields, &NoProgress)
    }

    pub fn table_with_progress(
        &self,
        table: &RecordTable,
        fields: &TableFields,
        observer: &dyn ProgressObserver,
    ) -> ProjectionResult<TableProjection> {
        project_table(
            self.h,
            table,
            fields,
            self.options.image_height(),
            self.options.parallel,
            observer,
        )
    }
}
