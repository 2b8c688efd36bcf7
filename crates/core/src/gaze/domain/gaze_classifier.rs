use crate::detection::domain::face_mesh::FaceMesh;
use crate::gaze::domain::gaze_direction::GazeDirection;
use crate::gaze::domain::gaze_error::GazeError;
use crate::gaze::domain::head_pose::{HeadPoseGeometry, DEFAULT_DEADBAND};
use crate::gaze::domain::iris_offset::{
    average_ratio, classify_ratio, DEFAULT_LEFT_THRESHOLD, DEFAULT_RIGHT_THRESHOLD,
};

/// Fixed decision constants. Not calibrated per user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GazeThresholds {
    /// Fraction of the eye-corner distance tolerated around the midpoint.
    pub head_pose_deadband: f64,
    pub iris_left: f64,
    pub iris_right: f64,
}

impl Default for GazeThresholds {
    fn default() -> Self {
        Self {
            head_pose_deadband: DEFAULT_DEADBAND,
            iris_left: DEFAULT_LEFT_THRESHOLD,
            iris_right: DEFAULT_RIGHT_THRESHOLD,
        }
    }
}

/// Both gaze labels for one face. The two are never reconciled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GazeReading {
    pub head_pose: GazeDirection,
    pub iris: GazeDirection,
    pub iris_ratio: f64,
}

/// Stateless per-frame gaze classifier.
#[derive(Clone, Debug, Default)]
pub struct GazeClassifier {
    thresholds: GazeThresholds,
}

impl GazeClassifier {
    pub fn new(thresholds: GazeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &GazeThresholds {
        &self.thresholds
    }

    /// Classifies one face. Only the horizontal axis matters, so the frame
    /// width is the only dimension needed.
    pub fn classify(&self, mesh: &FaceMesh, frame_width: u32) -> Result<GazeReading, GazeError> {
        let head_pose = HeadPoseGeometry::measure(mesh, frame_width)?
            .classify(self.thresholds.head_pose_deadband);
        let iris_ratio = average_ratio(mesh)?;
        let iris = classify_ratio(
            iris_ratio,
            self.thresholds.iris_left,
            self.thresholds.iris_right,
        );
        Ok(GazeReading {
            head_pose,
            iris,
            iris_ratio,
        })
    }
}
