//! Record tables and table-mode projection.
//!
//! A [`RecordTable`] is an ordered list of JSON objects. Projection reads two
//! numeric source fields from every row and writes the projected coordinates
//! into two output fields of a copy of that row. The input table is never
//! touched, so readers of it never observe half-written output.

use crate::error::{DegenerateProjection, ProjectionError, ProjectionResult};
use crate::homography::project;
use crate::projector::progress::ProgressTicker;
use crate::projector::{map_indexed, NoProgress, ParallelOptions, ProgressObserver, TableFields};
use crate::types::SourcePoint;
use log::{info, warn};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Instant;

/// One labeled row. Field order is preserved.
pub type Record = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordTable {
    rows: Vec<Record>,
}

impl RecordTable {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: Record) {
        self.rows.push(row);
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}

impl From<Vec<Record>> for RecordTable {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Record> for RecordTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Projected table plus the rows whose projection was degenerate.
///
/// Degenerate rows stay in the table with `null` output fields.
#[derive(Clone, Debug)]
pub struct TableProjection {
    pub table: RecordTable,
    /// Failures tagged with their row index, in row order.
    pub failures: Vec<DegenerateProjection>,
    pub elapsed_ms: f64,
}

impl TableProjection {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The projected table, or every failure if any row was degenerate.
    pub fn into_table(self) -> ProjectionResult<RecordTable> {
        if self.failures.is_empty() {
            Ok(self.table)
        } else {
            Err(ProjectionError::DegenerateBatch {
                total: self.table.len(),
                failures: self.failures,
            })
        }
    }
}

/// Project every row of `table`, reading `fields.x`/`fields.y` and writing
/// `fields.out_x`/`fields.out_y`.
///
/// A missing or non-numeric source field fails the whole call before any row
/// is projected.
pub fn transform_table(
    h: &Matrix3<f64>,
    table: &RecordTable,
    fields: &TableFields,
    image_height: f64,
) -> ProjectionResult<TableProjection> {
    project_table(
        h,
        table,
        fields,
        image_height,
        ParallelOptions::default(),
        &NoProgress,
    )
}

pub(crate) fn project_table(
    h: &Matrix3<f64>,
    table: &RecordTable,
    fields: &TableFields,
    image_height: f64,
    parallel: ParallelOptions,
    observer: &dyn ProgressObserver,
) -> ProjectionResult<TableProjection> {
    let points = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, record)| source_point(record, row, fields))
        .collect::<ProjectionResult<Vec<_>>>()?;

    let start = Instant::now();
    let ticker = ProgressTicker::start(observer, points.len());
    let projected = map_indexed(&points, parallel, |i, &p| {
        let r = project(h, p, image_height).map_err(|d| d.at(i));
        ticker.tick();
        r
    });
    ticker.finish();

    let mut rows = Vec::with_capacity(table.len());
    let mut failures = Vec::new();
    for (record, result) in table.rows.iter().zip(projected) {
        let mut row = record.clone();
        match result {
            Ok(t) => {
                row.insert(fields.out_x.clone(), Value::from(t.x));
                row.insert(fields.out_y.clone(), Value::from(t.y));
            }
            Err(d) => {
                warn!("Degenerate projection for row {}: {d}", d.index);
                row.insert(fields.out_x.clone(), Value::Null);
                row.insert(fields.out_y.clone(), Value::Null);
                failures.push(d);
            }
        }
        rows.push(row);
    }
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        "Projected {} rows ({} degenerate) in {:.3} ms",
        rows.len(),
        failures.len(),
        elapsed_ms
    );

    Ok(TableProjection {
        table: RecordTable::new(rows),
        failures,
        elapsed_ms,
    })
}

fn source_point(record: &Record, row: usize, fields: &TableFields) -> ProjectionResult<SourcePoint> {
    let x = numeric_field(record, row, &fields.x)?;
    let y = numeric_field(record, row, &fields.y)?;
    Ok(SourcePoint::new(x, y))
}

fn numeric_field(record: &Record, row: usize, field: &str) -> ProjectionResult<f64> {
    let value = record.get(field).ok_or_else(|| ProjectionError::MissingField {
        row,
        field: field.to_string(),
    })?;
    value.as_f64().ok_or_else(|| ProjectionError::NonNumericField {
        row,
        field: field.to_string(),
    })
}
