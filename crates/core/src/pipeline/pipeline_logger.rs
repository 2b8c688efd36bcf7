use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for monitor-loop events.
///
/// Use cases report through this trait so the CLI can print progress and a
/// run summary while tests stay silent.
pub trait PipelineLogger: Send {
    /// Report frame-level progress. `total` is 0 when the source length is
    /// unknown.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record one logged violation.
    fn violation(&mut self, frame_index: usize, reason: &str);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn violation(&mut self, _frame_index: usize, _reason: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger: per-stage timings, violation counts by reason, and a summary
/// at the end of the run, all through `log::info!`.
///
/// Progress output is throttled to every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Vec<f64>>,
    violations: BTreeMap<String, usize>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            violations: BTreeMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.violations.is_empty() && self.frames_seen == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Monitor summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let total_violations: usize = self.violations.values().sum();
        lines.push(format!("  Violations: {total_violations}"));
        for (reason, count) in &self.violations {
            lines.push(format!("    {reason}: {count}"));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn violation_count(&self, reason: &str) -> usize {
        self.violations.get(reason).copied().unwrap_or(0)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = self.frames_seen.max(current);
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Processing: {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn violation(&mut self, frame_index: usize, reason: &str) {
        *self.violations.entry(reason.to_string()).or_default() += 1;
        log::info!("Frame {frame_index}: {reason}");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ── NullPipelineLogger ──

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("detect", 5.0);
        logger.violation(0, "Multiple faces detected");
        logger.info("hello");
        logger.summary();
    }

    // ── StdoutPipelineLogger ──

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("landmarks", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect.len(), 2);
        assert_relative_eq!(detect[0], 20.0);
        assert_relative_eq!(detect[1], 30.0);
        assert_eq!(logger.timings_for("landmarks").unwrap().len(), 1);
        assert!(logger.timings_for("annotate").is_none());
    }

    #[test]
    fn test_violations_counted_per_reason() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.violation(0, "Multiple faces detected");
        logger.violation(1, "Multiple faces detected");
        logger.violation(1, "Iris Gaze: Looking LEFT");

        assert_eq!(logger.violation_count("Multiple faces detected"), 2);
        assert_eq!(logger.violation_count("Iris Gaze: Looking LEFT"), 1);
        assert_eq!(logger.violation_count("Eye Gaze: Looking RIGHT"), 0);
    }

    #[test]
    fn test_summary_lists_stages_and_violations() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(10, 10);
        logger.timing("detect", 20.0);
        logger.violation(3, "Eye Gaze: Looking RIGHT");

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Monitor summary (10 frames"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("Violations: 1"));
        assert!(summary.contains("Eye Gaze: Looking RIGHT: 1"));
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_summary_with_no_violations_reports_zero() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(1, 1);
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Violations: 0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_highest_frame() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, 0);
        }
        assert_eq!(logger.frames_seen, 20);
    }

    #[test]
    fn test_throttle_never_zero() {
        let logger = StdoutPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
        assert_eq!(StdoutPipelineLogger::default().throttle_frames, 30);
    }
}
