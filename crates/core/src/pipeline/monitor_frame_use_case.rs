use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::annotation::domain::status_label::StatusLabel;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::landmark_provider::LandmarkProvider;
use crate::gaze::domain::gaze_classifier::{GazeClassifier, GazeReading};
use crate::shared::clock::Clock;
use crate::shared::frame::Frame;
use crate::violation::domain::violation::{Violation, ViolationRecord};
use crate::violation::domain::violation_log::ViolationLog;
use chrono::NaiveDateTime;

/// Outcome of monitoring one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Raw detector count, independent of the landmark path.
    pub face_count: usize,
    /// Reading for the first mesh, if the landmark provider found a face.
    pub gaze: Option<GazeReading>,
    /// Violations logged for this frame, in log order.
    pub violations: Vec<Violation>,
    /// Status label texts drawn on the frame.
    pub labels: Vec<String>,
}

impl FrameReport {
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Per-frame monitor: detect → landmarks → classify → log → annotate.
///
/// Both models see the frame before anything is drawn on it. All violations
/// of one frame share a single timestamp.
pub struct MonitorFrameUseCase {
    detector: Box<dyn FaceDetector>,
    landmarks: Box<dyn LandmarkProvider>,
    classifier: GazeClassifier,
    log: Box<dyn ViolationLog>,
    clock: Box<dyn Clock>,
    annotator: Box<dyn FrameAnnotator>,
}

impl MonitorFrameUseCase {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        landmarks: Box<dyn LandmarkProvider>,
        classifier: GazeClassifier,
        log: Box<dyn ViolationLog>,
        clock: Box<dyn Clock>,
        annotator: Box<dyn FrameAnnotator>,
    ) -> Self {
        Self {
            detector,
            landmarks,
            classifier,
            log,
            clock,
            annotator,
        }
    }

    /// Runs one frame to completion, drawing the overlay in place.
    ///
    /// Any collaborator error aborts the frame. The multiple-faces row is
    /// appended before classification, so it stays in the log even when the
    /// landmark path fails.
    pub fn process(&mut self, frame: &mut Frame) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let timestamp = self.clock.now();

        let faces = self.detector.detect(frame)?;
        let meshes = self.landmarks.landmarks(frame)?;

        let mut violations = Vec::new();
        let mut labels = Vec::new();

        if faces.len() > 1 {
            self.record(timestamp, Violation::MultipleFaces, &mut violations)?;
            labels.push(StatusLabel::multiple_faces());
        }

        let gaze = match meshes.first() {
            Some(mesh) => {
                let reading = self.classifier.classify(mesh, frame.width())?;
                if reading.head_pose.is_away() {
                    self.record(timestamp, Violation::HeadTurned(reading.head_pose), &mut violations)?;
                }
                if reading.iris.is_away() {
                    self.record(timestamp, Violation::IrisAway(reading.iris), &mut violations)?;
                }
                labels.push(StatusLabel::head_pose(reading.head_pose));
                labels.push(StatusLabel::iris(reading.iris));
                Some(reading)
            }
            None => None,
        };

        log::debug!(
            "Frame {}: {} face(s), {} mesh(es), gaze {:?}",
            frame.index(),
            faces.len(),
            meshes.len(),
            gaze
        );

        self.annotator.annotate(frame, &faces, &labels);

        Ok(FrameReport {
            face_count: faces.len(),
            gaze,
            violations,
            labels: labels.into_iter().map(|l| l.text).collect(),
        })
    }

    fn record(
        &mut self,
        timestamp: NaiveDateTime,
        violation: Violation,
        logged: &mut Vec<Violation>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.log.append(&ViolationRecord::new(timestamp, &violation))?;
        logged.push(violation);
        Ok(())
    }
}
