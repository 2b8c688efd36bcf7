use crate::gaze::domain::gaze_direction::GazeDirection;

const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];
const MAGENTA: [u8; 3] = [255, 0, 100];
const YELLOW: [u8; 3] = [255, 255, 0];

/// Outline color for detected faces.
pub const FACE_BOX_COLOR: [u8; 3] = [0, 0, 255];

/// A piece of status text pinned to the top-left of the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLabel {
    pub text: String,
    pub color: [u8; 3],
    /// Baseline position in pixels.
    pub anchor: (i64, i64),
}

impl StatusLabel {
    pub fn multiple_faces() -> Self {
        Self {
            text: "Multiple Faces!".to_string(),
            color: RED,
            anchor: (50, 50),
        }
    }

    pub fn head_pose(direction: GazeDirection) -> Self {
        Self {
            text: format!("Looking {direction}"),
            color: if direction.is_away() { RED } else { GREEN },
            anchor: (50, 100),
        }
    }

    pub fn iris(direction: GazeDirection) -> Self {
        Self {
            text: format!("Iris: Looking {direction}"),
            color: if direction.is_away() { MAGENTA } else { YELLOW },
            anchor: (50, 140),
        }
    }
}
