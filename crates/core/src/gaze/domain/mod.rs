pub mod gaze_classifier;
pub mod gaze_direction;
pub mod gaze_error;
pub mod head_pose;
pub mod iris_offset;
