use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::pipeline::monitor_frame_use_case::MonitorFrameUseCase;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

/// Where annotated frames go.
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotatedOutput {
    /// The single annotated frame of a still image.
    Image(PathBuf),
    /// Every video frame that produced a violation, as `frame_NNNNNN.png`.
    ViolationFrames(PathBuf),
}

/// Totals for one monitored source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonitorSummary {
    pub frames: usize,
    /// Logged rows per reason string.
    pub violations: BTreeMap<String, usize>,
    pub annotated_frames: usize,
}

impl MonitorSummary {
    pub fn total_violations(&self) -> usize {
        self.violations.values().sum()
    }
}

/// Runs [`MonitorFrameUseCase`] over every frame of a video or image.
pub struct MonitorSourceUseCase {
    reader: Box<dyn VideoReader>,
    monitor: MonitorFrameUseCase,
    logger: Box<dyn PipelineLogger>,
    annotated: Option<(Box<dyn ImageWriter>, AnnotatedOutput)>,
}

impl MonitorSourceUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        monitor: MonitorFrameUseCase,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            monitor,
            logger,
            annotated: None,
        }
    }

    pub fn with_annotated_output(
        mut self,
        writer: Box<dyn ImageWriter>,
        output: AnnotatedOutput,
    ) -> Self {
        self.annotated = Some((writer, output));
        self
    }

    /// Processes frames in decode order until the source is exhausted or a
    /// frame fails. Annotated-frame write failures are logged and skipped.
    ///
    /// The reader is closed on every path once it has been opened.
    pub fn execute(&mut self, input: &Path) -> Result<MonitorSummary, Box<dyn std::error::Error>> {
        let metadata = self.reader.open(input)?;
        if matches!(self.annotated, Some((_, AnnotatedOutput::Image(_))))
            && !metadata.is_still_image()
        {
            self.reader.close();
            return Err("Annotated image output requires a still image input".into());
        }

        self.logger.info(&format!(
            "Monitoring {} ({}x{}, {} frames)",
            input.display(),
            metadata.width,
            metadata.height,
            metadata.total_frames
        ));

        let mut summary = MonitorSummary::default();
        let mut outcome = Ok(());
        for item in self.reader.frames() {
            let mut frame = match item {
                Ok(frame) => frame,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            };

            let start = Instant::now();
            let report = match self.monitor.process(&mut frame) {
                Ok(report) => report,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            };
            self.logger
                .timing("monitor", start.elapsed().as_secs_f64() * 1000.0);

            for violation in &report.violations {
                let reason = violation.reason();
                self.logger.violation(frame.index(), &reason);
                *summary.violations.entry(reason).or_default() += 1;
            }

            if let Some((writer, output)) = &self.annotated {
                let target = match output {
                    AnnotatedOutput::Image(path) => Some(path.clone()),
                    AnnotatedOutput::ViolationFrames(dir) if report.has_violations() => {
                        Some(dir.join(format!("frame_{:06}.png", frame.index())))
                    }
                    AnnotatedOutput::ViolationFrames(_) => None,
                };
                if let Some(path) = target {
                    let start = Instant::now();
                    match writer.write(&path, &frame) {
                        Ok(()) => summary.annotated_frames += 1,
                        Err(e) => log::warn!(
                            "Skipping annotated frame {}: {e}",
                            path.display()
                        ),
                    }
                    self.logger
                        .timing("write", start.elapsed().as_secs_f64() * 1000.0);
                }
            }

            summary.frames += 1;
            self.logger.progress(summary.frames, metadata.total_frames);
        }

        self.reader.close();
        self.logger.summary();
        outcome.map(|()| summary)
    }
}
