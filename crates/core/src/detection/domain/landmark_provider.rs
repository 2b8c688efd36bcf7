use crate::detection::domain::face_mesh::FaceMesh;
use crate::shared::frame::Frame;

/// Domain interface for dense face-landmark extraction.
///
/// Returns zero or more meshes in provider order. Consumers classify only
/// the first one.
pub trait LandmarkProvider: Send {
    fn landmarks(&mut self, frame: &Frame) -> Result<Vec<FaceMesh>, Box<dyn std::error::Error>>;
}
