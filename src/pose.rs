//! Pose error between an estimated and a ground-truth rigid transform
//!
//! Both transforms are homogeneous 4x4 matrices. The top-left 3x3 block is
//! read as rotation and the first three entries of the last column as
//! translation; nothing checks that the rotation block is orthonormal.
//!
//! ## Rotation error
//!
//! The relative rotation `R_gt * R_est^T` is decomposed into XYZ Euler angles
//! and the error is the Euclidean norm of the angle vector, in radians. This
//! is not the geodesic angle; it is kept so numbers stay comparable with
//! earlier sweeps.

use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// 3x3 rotation block
pub type Mat3 = Matrix3<f64>;
/// 4x4 homogeneous transform
pub type Mat4 = Matrix4<f64>;
/// 3-vector (translation, Euler angles)
pub type Vec3 = Vector3<f64>;

/// Below this value of `sqrt(R00^2 + R10^2)` the Euler decomposition is
/// treated as gimbal-locked.
pub const GIMBAL_LOCK_THRESHOLD: f64 = 1e-6;

/// A homogeneous 4x4 transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    /// Wrap a 4x4 matrix.
    #[must_use]
    pub const fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Mat4::identity())
    }

    /// Build a transform from a rotation block and a translation.
    #[must_use]
    pub fn from_parts(rotation: &Mat3, translation: &Vec3) -> Self {
        let mut matrix = Mat4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
        Self::new(matrix)
    }

    /// Build a transform from row-major nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatrixShape`] unless there are exactly four rows of
    /// exactly four entries.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], context: &str) -> Result<Self> {
        let shape_error = |cols: usize| Error::MatrixShape {
            context: context.to_string(),
            rows: rows.len(),
            cols,
        };
        if rows.len() != 4 {
            return Err(shape_error(rows.first().map_or(0, |r| r.as_ref().len())));
        }
        let mut matrix = Mat4::zeros();
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != 4 {
                return Err(shape_error(row.len()));
            }
            for (j, value) in row.iter().enumerate() {
                matrix[(i, j)] = *value;
            }
        }
        Ok(Self::new(matrix))
    }

    /// Parse a whitespace-delimited 4x4 matrix, one row per line.
    ///
    /// Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] for a non-numeric token and
    /// [`Error::MatrixShape`] for any shape other than 4x4.
    pub fn parse_text(text: &str, context: &str) -> Result<Self> {
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split_whitespace()
                    .map(|token| {
                        token.parse::<f64>().map_err(|_| Error::InvalidNumber {
                            context: context.to_string(),
                            value: token.to_string(),
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(&rows, context)
    }

    /// Load a ground-truth transform file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GroundTruth`] wrapping the read or parse failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::ground_truth(path, e))?;
        Self::parse_text(&text, "ground truth").map_err(|e| Error::ground_truth(path, e))
    }

    /// Get the underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Top-left 3x3 block.
    #[must_use]
    pub fn rotation(&self) -> Mat3 {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// First three rows of the last column.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

/// Decoupled rotation/translation error of one estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseError {
    /// Norm of the XYZ Euler angles of the relative rotation (radians)
    pub rotation: f64,
    /// Euclidean distance between translations
    pub translation: f64,
}

impl PoseError {
    /// Compare an estimate against ground truth.
    #[must_use]
    pub fn between(estimated: &Transform, ground_truth: &Transform) -> Self {
        let relative = ground_truth.rotation() * estimated.rotation().transpose();
        Self {
            rotation: euler_xyz(&relative).norm(),
            translation: (estimated.translation() - ground_truth.translation()).norm(),
        }
    }
}

/// Decompose a rotation block into `(x, y, z)` Euler angles.
///
/// When `sy = sqrt(R00^2 + R10^2)` falls below [`GIMBAL_LOCK_THRESHOLD`] the
/// z angle is fixed at zero and x is recovered from `R12`/`R11` instead.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn euler_xyz(r: &Mat3) -> Vec3 {
    let sy = (r[(0, 0)] * r[(0, 0)] + r[(1, 0)] * r[(1, 0)]).sqrt();
    let y = (-r[(2, 0)]).atan2(sy);
    if sy < GIMBAL_LOCK_THRESHOLD {
        let x = (-r[(1, 2)]).atan2(r[(1, 1)]);
        Vec3::new(x, y, 0.0)
    } else {
        let x = r[(2, 1)].atan2(r[(2, 2)]);
        let z = r[(1, 0)].atan2(r[(0, 0)]);
        Vec3::new(x, y, z)
    }
}
