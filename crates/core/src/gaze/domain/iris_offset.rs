//! Iris-offset ratio: where the iris sits between an eye's two corners.

use crate::detection::domain::face_mesh::FaceMesh;
use crate::gaze::domain::gaze_direction::GazeDirection;
use crate::gaze::domain::gaze_error::GazeError;
use crate::shared::constants::{
    LEFT_EYE_INNER, LEFT_EYE_OUTER, LEFT_IRIS_CENTER, RIGHT_EYE_INNER, RIGHT_EYE_OUTER,
    RIGHT_IRIS_CENTER,
};

pub const DEFAULT_LEFT_THRESHOLD: f64 = 0.35;
pub const DEFAULT_RIGHT_THRESHOLD: f64 = 0.65;

/// Landmark indices for one eye. Distances are measured from `corner_a`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeIndices {
    pub corner_a: usize,
    pub corner_b: usize,
    pub iris: usize,
}

pub const LEFT_EYE: EyeIndices = EyeIndices {
    corner_a: LEFT_EYE_OUTER,
    corner_b: LEFT_EYE_INNER,
    iris: LEFT_IRIS_CENTER,
};

pub const RIGHT_EYE: EyeIndices = EyeIndices {
    corner_a: RIGHT_EYE_INNER,
    corner_b: RIGHT_EYE_OUTER,
    iris: RIGHT_IRIS_CENTER,
};

/// `|corner_a - iris| / |corner_a - corner_b|` over normalized 2D coordinates.
pub fn eye_ratio(mesh: &FaceMesh, eye: EyeIndices) -> Result<f64, GazeError> {
    let a = mesh.point(eye.corner_a)?;
    let b = mesh.point(eye.corner_b)?;
    let iris = mesh.point(eye.iris)?;

    let eye_width = a.distance_2d(b);
    if eye_width == 0.0 {
        return Err(GazeError::DegenerateEye {
            corner_a: eye.corner_a,
            corner_b: eye.corner_b,
        });
    }
    Ok(a.distance_2d(iris) / eye_width)
}

/// Mean of the left and right eye ratios.
pub fn average_ratio(mesh: &FaceMesh) -> Result<f64, GazeError> {
    let left = eye_ratio(mesh, LEFT_EYE)?;
    let right = eye_ratio(mesh, RIGHT_EYE)?;
    Ok((left + right) / 2.0)
}

/// Strict comparisons: a ratio equal to either threshold is CENTER.
pub fn classify_ratio(ratio: f64, left_threshold: f64, right_threshold: f64) -> GazeDirection {
    if ratio < left_threshold {
        GazeDirection::Left
    } else if ratio > right_threshold {
        GazeDirection::Right
    } else {
        GazeDirection::Center
    }
}
