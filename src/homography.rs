//! Homography construction and the per-point projection kernel.
//!
//! Every public operation of the crate ends up in [`project`], which maps one
//! source pixel through the matrix, removes the homogeneous scale and flips
//! the vertical axis against the target image height.

use crate::error::{DegenerateProjection, ProjectionError};
use crate::types::{SourcePoint, TargetPoint};
use nalgebra::{Matrix3, Vector3};

/// Build a homography from nested rows, e.g. the matrix layout produced by a
/// calibration tool and stored in JSON.
pub fn homography_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Matrix3<f64>, ProjectionError> {
    let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    if rows.len() != 3 {
        return Err(ProjectionError::MatrixShape {
            rows: rows.len(),
            cols,
        });
    }
    if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != 3) {
        return Err(ProjectionError::MatrixShape {
            rows: 3,
            cols: bad.as_ref().len(),
        });
    }
    let mut m = Matrix3::zeros();
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.as_ref().iter().enumerate() {
            m[(i, j)] = v;
        }
    }
    Ok(m)
}

/// Build a homography from 9 values in row-major order.
pub fn homography_from_row_slice(values: &[f64]) -> Result<Matrix3<f64>, ProjectionError> {
    if values.len() != 9 {
        return Err(ProjectionError::MatrixLen { len: values.len() });
    }
    Ok(Matrix3::from_row_slice(values))
}

/// Interpret a dynamic coordinate list as a source point.
pub fn point_from_slice(coords: &[f64]) -> Result<SourcePoint, ProjectionError> {
    match coords {
        [x, y] => Ok(SourcePoint::new(*x, *y)),
        _ => Err(ProjectionError::PointShape { len: coords.len() }),
    }
}

/// Map a single source pixel into the bottom-origin target frame.
///
/// The returned error carries index 0; batch callers re-tag it with the
/// position of the point.
pub fn project(
    h: &Matrix3<f64>,
    p: SourcePoint,
    image_height: f64,
) -> Result<TargetPoint, DegenerateProjection> {
    let v = h * Vector3::new(p.x, p.y, 1.0);
    let w = v[2];
    let degenerate = DegenerateProjection {
        index: 0,
        x: p.x,
        y: p.y,
        w,
    };
    if w == 0.0 || !w.is_finite() || !v[0].is_finite() || !v[1].is_finite() {
        return Err(degenerate);
    }
    let x = v[0] / w;
    let y = v[1] / w;
    let flipped = image_height - y;
    if !x.is_finite() || !y.is_finite() || !flipped.is_finite() {
        return Err(degenerate);
    }
    Ok(TargetPoint::new(x, flipped))
}

/// # Safety
/// `matrix_ptr` must point to 9 row-major values, `pts_ptr` and `out_ptr` to
/// `2 * point_count` interleaved coordinates each.
///
/// Degenerate points are written as NaN. Returns the number of degenerate
/// points, or -1 when a pointer is null or `point_count` exceeds `i32::MAX`.
#[no_mangle]
pub unsafe extern "C" fn projector_transform_points(
    matrix_ptr: *const f64,
    pts_ptr: *const f64,
    point_count: usize,
    image_height: f64,
    out_ptr: *mut f64,
) -> i32 {
    if matrix_ptr.is_null() || pts_ptr.is_null() || out_ptr.is_null() {
        return -1;
    }
    if point_count > i32::MAX as usize {
        return -1;
    }
    let matrix_slice = unsafe { std::slice::from_raw_parts(matrix_ptr, 9) };
    let m = Matrix3::from_row_slice(matrix_slice);
    let pts_slice = unsafe { std::slice::from_raw_parts(pts_ptr, point_count * 2) };
    let out_slice = unsafe { std::slice::from_raw_parts_mut(out_ptr, point_count * 2) };
    let mut failed = 0i32;
    for idx in 0..point_count {
        let p = SourcePoint::new(pts_slice[2 * idx], pts_slice[2 * idx + 1]);
        match project(&m, p, image_height) {
            Ok(t) => {
                out_slice[2 * idx] = t.x;
                out_slice[2 * idx + 1] = t.y;
            }
            Err(_) => {
                out_slice[2 * idx] = f64::NAN;
                out_slice[2 * idx + 1] = f64::NAN;
                failed += 1;
            }
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_flips_y_against_height() {
        let t = project(&Matrix3::identity(), SourcePoint::new(10.0, 20.0), 100.0).unwrap();
        assert_eq!(t, TargetPoint::new(10.0, 80.0));
    }

    #[test]
    fn removes_homogeneous_scale() {
        // Uniform scale 2 in the last row halves every coordinate.
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0);
        let t = project(&h, SourcePoint::new(40.0, 60.0), 100.0).unwrap();
        assert!((t.x - 20.0).abs() < 1e-12, "x={}", t.x);
        assert!((t.y - 70.0).abs() < 1e-12, "y={}", t.y);
    }

    #[test]
    fn perspective_row_divides_per_point() {
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.01, 0.0, 1.0);
        let t = project(&h, SourcePoint::new(100.0, 50.0), 0.0).unwrap();
        assert!((t.x - 50.0).abs() < 1e-9, "x={}", t.x);
        assert!((t.y + 25.0).abs() < 1e-9, "y={}", t.y);
    }

    #[test]
    fn zero_scale_is_degenerate() {
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -5.0);
        let err = project(&h, SourcePoint::new(5.0, 3.0), 100.0).unwrap_err();
        assert_eq!(err.w, 0.0);
        assert_eq!((err.x, err.y), (5.0, 3.0));
    }

    #[test]
    fn non_finite_input_is_degenerate() {
        let err = project(&Matrix3::identity(), SourcePoint::new(f64::NAN, 0.0), 10.0);
        assert!(err.is_err());
    }

    #[test]
    fn non_finite_height_is_degenerate() {
        let h = Matrix3::identity();
        for height in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = project(&h, SourcePoint::new(10.0, 20.0), height).unwrap_err();
            assert_eq!((err.x, err.y), (10.0, 20.0));
        }
    }

    #[test]
    fn overflowing_flip_is_degenerate() {
        // Both y and height are finite, but height - y exceeds f64::MAX.
        let err = project(&Matrix3::identity(), SourcePoint::new(1.0, -1.7e308), 1.7e308);
        assert!(err.is_err());
    }

    #[test]
    fn c_entry_point_rejects_oversized_counts() {
        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let pts = [0.0f64; 2];
        let mut out = [0.0f64; 2];
        // The count check runs before the buffers are read.
        let status = unsafe {
            projector_transform_points(
                m.as_ptr(),
                pts.as_ptr(),
                i32::MAX as usize + 1,
                10.0,
                out.as_mut_ptr(),
            )
        };
        assert_eq!(status, -1);
    }

    #[test]
    fn rows_must_be_three_by_three() {
        let ok = homography_from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]).unwrap();
        assert_eq!(ok[(0, 2)], 3.0);
        assert_eq!(ok[(2, 0)], 7.0);

        let short = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(
            homography_from_rows(&short),
            Err(ProjectionError::MatrixShape { rows: 2, cols: 3 })
        );
        let ragged = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0, 1.0]];
        assert_eq!(
            homography_from_rows(&ragged),
            Err(ProjectionError::MatrixShape { rows: 3, cols: 2 })
        );
    }

    #[test]
    fn row_slice_is_row_major() {
        let m = homography_from_row_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(
            homography_from_row_slice(&[1.0; 10]),
            Err(ProjectionError::MatrixLen { len: 10 })
        );
        assert_eq!(
            homography_from_row_slice(&[]),
            Err(ProjectionError::MatrixLen { len: 0 })
        );
    }

    #[test]
    fn point_needs_two_coordinates() {
        assert_eq!(point_from_slice(&[1.0, 2.0]), Ok(SourcePoint::new(1.0, 2.0)));
        assert_eq!(
            point_from_slice(&[1.0, 2.0, 3.0]),
            Err(ProjectionError::PointShape { len: 3 })
        );
    }

    #[test]
    fn c_entry_point_marks_degenerate_points() {
        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        // Second point has y = 0, so the scale factor (= y) vanishes.
        let pts = [10.0, 5.0, 3.0, 0.0];
        let mut out = [0.0f64; 4];
        let failed = unsafe {
            projector_transform_points(m.as_ptr(), pts.as_ptr(), 2, 10.0, out.as_mut_ptr())
        };
        assert_eq!(failed, 1);
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[1] - 9.0).abs() < 1e-12);
        assert!(out[2].is_nan() && out[3].is_nan());
    }
}
