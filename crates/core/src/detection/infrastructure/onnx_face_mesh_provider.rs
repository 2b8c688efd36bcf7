//! Face-mesh landmark provider using ONNX Runtime via `ort`.
//!
//! Locates the face with its own detector, crops a padded square around
//! it and runs the 478-point landmark model on the crop. Configured for a
//! single face: only the most confident detection is meshed.

use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_mesh::{FaceMesh, Landmark};
use crate::detection::domain::landmark_provider::LandmarkProvider;
use crate::shared::constants::FACE_MESH_POINTS;
use crate::shared::frame::Frame;

use super::execution_provider::load_session;
use super::math::{sigmoid, window_to_tensor, PixelRange, SampleWindow};

/// Landmark model input resolution.
const INPUT_SIZE: u32 = 192;

/// Crop side relative to the longer side of the detected box.
const CROP_SCALE: f64 = 1.5;

pub const DEFAULT_PRESENCE_THRESHOLD: f64 = 0.5;

pub struct OnnxFaceMeshProvider {
    locator: Box<dyn FaceDetector>,
    session: ort::session::Session,
    presence_threshold: f64,
}

impl OnnxFaceMeshProvider {
    /// `locator` should carry the mesh path's own confidence threshold,
    /// separate from the face-count detector.
    pub fn new(
        model_path: &Path,
        locator: Box<dyn FaceDetector>,
        presence_threshold: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        Ok(Self {
            locator,
            session,
            presence_threshold,
        })
    }
}

impl LandmarkProvider for OnnxFaceMeshProvider {
    fn landmarks(&mut self, frame: &Frame) -> Result<Vec<FaceMesh>, Box<dyn std::error::Error>> {
        let regions = self.locator.detect(frame)?;
        let Some(face) = regions.iter().max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }) else {
            return Ok(Vec::new());
        };

        let (x, y, side) = face.padded_square(CROP_SCALE);
        let window = SampleWindow::square(x, y, side);
        let input = window_to_tensor(frame, window, INPUT_SIZE, PixelRange::Unit);
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // landmarks: [1, 1434] (any leading dims), presence logit: [1, 1]
        if outputs.len() < 2 {
            return Err(format!(
                "Face mesh model expected 2 outputs, got {}",
                outputs.len()
            )
            .into());
        }
        let coords = outputs[0].try_extract_array::<f32>()?;
        let presence = outputs[1].try_extract_array::<f32>()?;
        let coords = coords.as_slice().ok_or("Cannot get landmark slice")?;
        let presence = presence
            .as_slice()
            .and_then(|s| s.first().copied())
            .ok_or("Cannot get presence score")?;

        let presence = sigmoid(presence) as f64;
        if presence < self.presence_threshold {
            log::debug!(
                "Face mesh presence {presence:.2} below threshold in frame {}",
                frame.index()
            );
            return Ok(Vec::new());
        }

        Ok(vec![decode_mesh(coords, window, frame)?])
    }
}

/// Converts crop-space `(x, y, z)` triples into a mesh in normalized frame
/// coordinates.
fn decode_mesh(
    coords: &[f32],
    window: SampleWindow,
    frame: &Frame,
) -> Result<FaceMesh, Box<dyn std::error::Error>> {
    if coords.len() < FACE_MESH_POINTS * 3 {
        return Err(format!(
            "Face mesh model returned {} values, expected {} (refined iris landmarks required)",
            coords.len(),
            FACE_MESH_POINTS * 3
        )
        .into());
    }

    let size = INPUT_SIZE as f64;
    let points = coords
        .chunks_exact(3)
        .take(FACE_MESH_POINTS)
        .map(|p| {
            let (x, y) = window.to_frame_normalized(p[0] as f64 / size, p[1] as f64 / size, frame);
            Landmark {
                x,
                y,
                z: p[2] as f64 / size,
            }
        })
        .collect();
    Ok(FaceMesh::new(points))
}
