//! Head-pose proxy: nose-tip position against the eye-corner midpoint.
//!
//! Works in whole pixels. Each normalized x is scaled by the frame width
//! and truncated, and the midpoint uses floor division.

use crate::detection::domain::face_mesh::FaceMesh;
use crate::gaze::domain::gaze_direction::GazeDirection;
use crate::gaze::domain::gaze_error::GazeError;
use crate::shared::constants::{LEFT_EYE_OUTER, NOSE_TIP, RIGHT_EYE_OUTER};

pub const DEFAULT_DEADBAND: f64 = 0.2;

/// Pixel-space measurements behind a head-pose label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadPoseGeometry {
    pub nose_x: i64,
    pub midpoint: i64,
    /// Horizontal distance between the two eye corners.
    pub eye_range: i64,
}

impl HeadPoseGeometry {
    pub fn measure(mesh: &FaceMesh, frame_width: u32) -> Result<Self, GazeError> {
        let to_px = |normalized: f64| (normalized * frame_width as f64) as i64;
        let left_x = to_px(mesh.point(LEFT_EYE_OUTER)?.x);
        let right_x = to_px(mesh.point(RIGHT_EYE_OUTER)?.x);
        let nose_x = to_px(mesh.point(NOSE_TIP)?.x);
        Ok(Self {
            nose_x,
            midpoint: (left_x + right_x).div_euclid(2),
            eye_range: (right_x - left_x).abs(),
        })
    }

    /// LEFT or RIGHT once the nose leaves `deadband * eye_range` around the midpoint.
    pub fn classify(&self, deadband: f64) -> GazeDirection {
        let margin = self.eye_range as f64 * deadband;
        let nose = self.nose_x as f64;
        let mid = self.midpoint as f64;
        if nose < mid - margin {
            GazeDirection::Left
        } else if nose > mid + margin {
            GazeDirection::Right
        } else {
            GazeDirection::Center
        }
    }
}
