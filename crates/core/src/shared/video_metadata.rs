use std::path::PathBuf;

/// Describes an opened frame source.
///
/// Still images are one-frame sources with `fps == 0.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Container-reported frame count; 0 when unknown.
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn is_still_image(&self) -> bool {
        self.fps == 0.0 && self.total_frames == 1
    }
}
