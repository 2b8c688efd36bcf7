//! BlazeFace face detector using ONNX Runtime via `ort`.
//!
//! Produces bounding boxes only. Serves as the raw face counter and as the
//! face locator in front of the landmark model.

use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::execution_provider::load_session;
use super::math::{sigmoid, window_to_tensor, PixelRange, SampleWindow};

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;

const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output: box (4) + 6 keypoints (12).
const REGRESSOR_STRIDE: usize = 16;

pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        Ok(Self {
            session,
            confidence,
            anchors: generate_anchors(),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let input = window_to_tensor(
            frame,
            SampleWindow::full_frame(frame),
            INPUT_SIZE,
            PixelRange::Signed,
        );
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1]
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let regions = decode_detections(
            reg_data,
            score_data,
            &self.anchors,
            self.confidence,
            frame.width(),
            frame.height(),
        );
        log::debug!(
            "BlazeFace found {} face(s) in frame {}",
            regions.len(),
            frame.index()
        );
        Ok(regions)
    }
}

/// Turns raw anchor outputs into suppressed, frame-space regions.
fn decode_detections(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    confidence: f64,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Region> {
    let size = INPUT_SIZE as f32;
    let fw = frame_width as f64;
    let fh = frame_height as f64;

    let candidates = score_data
        .iter()
        .zip(anchors)
        .enumerate()
        .filter_map(|(i, (&raw_score, anchor))| {
            let score = sigmoid(raw_score) as f64;
            if score < confidence {
                return None;
            }
            let reg = reg_data.get(i * REGRESSOR_STRIDE..i * REGRESSOR_STRIDE + 4)?;
            let cx = (anchor[0] + reg[0] / size) as f64;
            let cy = (anchor[1] + reg[1] / size) as f64;
            let w = (reg[2] / size) as f64;
            let h = (reg[3] / size) as f64;
            Some(Region::from_corners(
                (cx - w / 2.0) * fw,
                (cy - h / 2.0) * fh,
                (cx + w / 2.0) * fw,
                (cy + h / 2.0) * fh,
                score,
                frame_width,
                frame_height,
            ))
        })
        .filter(|r| r.width > 0 && r.height > 0)
        .collect();

    Region::suppress_overlaps(candidates, NMS_IOU_THRESH)
}

/// Anchor centers for the short-range model: a 16x16 grid with 2 anchors
/// per cell followed by an 8x8 grid with 6 per cell.
fn generate_anchors() -> Vec<[f32; 2]> {
    let layers = [(8usize, 2usize), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for (stride, per_cell) in layers {
        let grid = INPUT_SIZE as usize / stride;
        for y in 0..grid {
            for x in 0..grid {
                let center = [
                    (x as f32 + 0.5) / grid as f32,
                    (y as f32 + 0.5) / grid as f32,
                ];
                anchors.extend(std::iter::repeat(center).take(per_cell));
            }
        }
    }

    anchors
}
