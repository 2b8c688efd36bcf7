use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for raw face detection.
///
/// The face-count check and the landmark path each own an instance with
/// its own confidence threshold, so the two may disagree on the same frame.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
