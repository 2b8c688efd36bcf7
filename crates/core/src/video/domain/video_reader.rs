use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Iterator over decoded frames; a decode failure ends processing.
pub type FrameIter<'a> = Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + 'a>;

/// Reads frames from a video or image source.
///
/// Implementations handle decoding; the monitor only sees [`Frame`]s and
/// [`VideoMetadata`].
pub trait VideoReader: Send {
    /// Opens a video or image file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(&mut self) -> FrameIter<'_>;

    /// Releases any resources held by the reader.
    fn close(&mut self);
}
