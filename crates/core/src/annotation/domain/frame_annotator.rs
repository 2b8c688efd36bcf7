use crate::annotation::domain::status_label::StatusLabel;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for drawing monitor output onto a frame.
///
/// Implementations modify the frame in place (`&mut Frame`).
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, faces: &[Region], labels: &[StatusLabel]);
}
