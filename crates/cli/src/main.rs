mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use gazeguard_core::annotation::infrastructure::overlay_annotator::OverlayAnnotator;
use gazeguard_core::detection::domain::face_detector::FaceDetector;
use gazeguard_core::detection::domain::landmark_provider::LandmarkProvider;
use gazeguard_core::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use gazeguard_core::detection::infrastructure::onnx_face_mesh_provider::{
    OnnxFaceMeshProvider, DEFAULT_PRESENCE_THRESHOLD,
};
use gazeguard_core::gaze::domain::gaze_classifier::{GazeClassifier, GazeThresholds};
use gazeguard_core::pipeline::monitor_frame_use_case::MonitorFrameUseCase;
use gazeguard_core::pipeline::monitor_source_use_case::{AnnotatedOutput, MonitorSourceUseCase};
use gazeguard_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use gazeguard_core::shared::clock::SystemClock;
use gazeguard_core::shared::constants::{
    DETECTOR_MODEL_NAME, FACE_MESH_MODEL_NAME, IMAGE_EXTENSIONS,
};
use gazeguard_core::shared::model_resolver::{self, ModelResolveError, ModelSource};
use gazeguard_core::video::domain::video_reader::VideoReader;
use gazeguard_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use gazeguard_core::video::infrastructure::image_file_reader::ImageFileReader;
use gazeguard_core::video::infrastructure::image_file_writer::ImageFileWriter;
use gazeguard_core::violation::infrastructure::csv_violation_log::CsvViolationLog;

use settings::Settings;

/// Gaze and face-presence monitoring for videos and images.
///
/// Violations (multiple faces, head turned, eyes away) are appended to a
/// CSV log.
#[derive(Parser)]
#[command(name = "gazeguard")]
struct Cli {
    /// Input video or image file.
    input: PathBuf,

    /// Violation log (CSV, appended).
    #[arg(long)]
    log: Option<PathBuf>,

    /// Write the annotated image here (image inputs only).
    #[arg(long, conflicts_with = "annotated_dir")]
    output: Option<PathBuf>,

    /// Save annotated frames that produced a violation into this directory.
    #[arg(long)]
    annotated_dir: Option<PathBuf>,

    /// Settings file (JSON). Defaults to the per-user config location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Face-count detector confidence threshold (0.0-1.0).
    #[arg(long)]
    detection_confidence: Option<f64>,

    /// Confidence of the face locator feeding the landmark model (0.0-1.0).
    #[arg(long)]
    mesh_confidence: Option<f64>,

    /// Head-pose dead band as a fraction of the eye span (0.0-1.0).
    #[arg(long)]
    head_deadband: Option<f64>,

    /// Iris ratio below which the eyes count as looking left.
    #[arg(long)]
    iris_left: Option<f64>,

    /// Iris ratio above which the eyes count as looking right.
    #[arg(long)]
    iris_right: Option<f64>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = effective_settings(&cli)?;
    validate(&cli, &settings)?;

    let monitor = build_monitor(&settings)?;
    let image = is_image(&cli.input);
    let reader: Box<dyn VideoReader> = if image {
        Box::new(ImageFileReader::new())
    } else {
        Box::new(FfmpegReader::new())
    };

    let mut use_case =
        MonitorSourceUseCase::new(reader, monitor, Box::new(StdoutPipelineLogger::default()));
    if let Some(output) = &cli.output {
        use_case = use_case.with_annotated_output(
            Box::new(ImageFileWriter::new()),
            AnnotatedOutput::Image(output.clone()),
        );
    } else if let Some(dir) = &cli.annotated_dir {
        use_case = use_case.with_annotated_output(
            Box::new(ImageFileWriter::new()),
            AnnotatedOutput::ViolationFrames(dir.clone()),
        );
    }

    let summary = use_case.execute(&cli.input)?;
    log::info!(
        "Processed {} frame(s), {} violation(s) logged to {}",
        summary.frames,
        summary.total_violations(),
        settings.log_file.display()
    );
    if let Some(output) = &cli.output {
        log::info!("Annotated image written to {}", output.display());
    }
    Ok(())
}

/// Defaults, then the settings file, then command-line flags.
fn effective_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load_default(),
    };

    if let Some(v) = cli.detection_confidence {
        settings.detection_confidence = v;
    }
    if let Some(v) = cli.mesh_confidence {
        settings.mesh_confidence = v;
    }
    if let Some(v) = cli.head_deadband {
        settings.head_deadband = v;
    }
    if let Some(v) = cli.iris_left {
        settings.iris_left = v;
    }
    if let Some(v) = cli.iris_right {
        settings.iris_right = v;
    }
    if let Some(path) = &cli.log {
        settings.log_file = path.clone();
    }
    Ok(settings)
}

fn build_monitor(settings: &Settings) -> Result<MonitorFrameUseCase, Box<dyn std::error::Error>> {
    let detector_path = resolve_model(
        DETECTOR_MODEL_NAME,
        settings.models_dir.clone(),
        settings.detector_model_url.clone(),
        "detector_model_url",
    )?;
    let mesh_path = resolve_model(
        FACE_MESH_MODEL_NAME,
        settings.models_dir.clone(),
        settings.face_mesh_model_url.clone(),
        "face_mesh_model_url",
    )?;

    let detector: Box<dyn FaceDetector> = Box::new(OnnxBlazefaceDetector::new(
        &detector_path,
        settings.detection_confidence,
    )?);
    let locator = Box::new(OnnxBlazefaceDetector::new(
        &detector_path,
        settings.mesh_confidence,
    )?);
    let landmarks: Box<dyn LandmarkProvider> = Box::new(OnnxFaceMeshProvider::new(
        &mesh_path,
        locator,
        DEFAULT_PRESENCE_THRESHOLD,
    )?);

    let classifier = GazeClassifier::new(GazeThresholds {
        head_pose_deadband: settings.head_deadband,
        iris_left: settings.iris_left,
        iris_right: settings.iris_right,
    });

    Ok(MonitorFrameUseCase::new(
        detector,
        landmarks,
        classifier,
        Box::new(CsvViolationLog::new(settings.log_file.clone())),
        Box::new(SystemClock),
        Box::new(OverlayAnnotator::default()),
    ))
}

/// `url_key` names the settings entry that holds this model's download URL.
fn resolve_model(
    name: &str,
    bundled_dir: Option<PathBuf>,
    url: Option<String>,
    url_key: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let will_download = url.is_some();
    let path = model_resolver::resolve(
        name,
        &ModelSource { bundled_dir, url },
        Some(Box::new(download_progress)),
    )
    .map_err(|e| with_settings_hint(e, url_key))?;
    if will_download {
        eprintln!();
    }
    Ok(path)
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    for (name, value) in [
        ("Detection confidence", settings.detection_confidence),
        ("Mesh confidence", settings.mesh_confidence),
        ("Head deadband", settings.head_deadband),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} must be between 0.0 and 1.0, got {value}").into());
        }
    }
    let (left, right) = (settings.iris_left, settings.iris_right);
    if !(0.0 <= left && left < right && right <= 1.0) {
        return Err(format!(
            "Iris thresholds must satisfy 0 <= left < right <= 1, got left={left} right={right}"
        )
        .into());
    }
    if cli.output.is_some() && !is_image(&cli.input) {
        return Err("--output is only supported for image inputs; use --annotated-dir for videos".into());
    }
    Ok(())
}

/// Names the settings keys that supply a missing model. Other errors pass through.
fn with_settings_hint(err: ModelResolveError, url_key: &str) -> Box<dyn std::error::Error> {
    match err {
        ModelResolveError::NotFound { .. } => format!(
            "{err} (set \"models_dir\" or \"{url_key}\" in settings.json, see --config)"
        )
        .into(),
        other => other.into(),
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gazeguard").chain(args.iter().copied())).unwrap()
    }

    fn existing_input(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_is_image_by_extension() {
        assert!(is_image(Path::new("a.PNG")));
        assert!(is_image(Path::new("dir/b.jpeg")));
        assert!(!is_image(Path::new("c.mp4")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_missing_model_error_names_settings_keys() {
        let err = ModelResolveError::NotFound {
            name: FACE_MESH_MODEL_NAME.to_string(),
            searched: vec![PathBuf::from("/cache")],
        };
        let message = with_settings_hint(err, "face_mesh_model_url").to_string();
        assert!(message.contains(FACE_MESH_MODEL_NAME));
        assert!(message.contains("\"models_dir\""));
        assert!(message.contains("\"face_mesh_model_url\""));
    }

    #[test]
    fn test_other_resolve_errors_pass_through() {
        let message = with_settings_hint(ModelResolveError::NoCacheDir, "detector_model_url").to_string();
        assert_eq!(message, "could not determine cache directory");
    }

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, r#"{"iris_left": 0.3, "iris_right": 0.7, "head_deadband": 0.1}"#)
            .unwrap();

        let cli = cli(&[
            "in.png",
            "--config",
            config.to_str().unwrap(),
            "--iris-right",
            "0.8",
            "--log",
            "exam.csv",
        ]);
        let s = effective_settings(&cli).unwrap();
        assert_eq!(s.iris_left, 0.3);
        assert_eq!(s.iris_right, 0.8);
        assert_eq!(s.head_deadband, 0.1);
        assert_eq!(s.detection_confidence, 0.5);
        assert_eq!(s.log_file, PathBuf::from("exam.csv"));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_input(dir.path(), "in.mp4");
        let cli = cli(&[input.to_str().unwrap()]);
        assert!(validate(&cli, &Settings::default()).is_ok());
    }

    #[test]
    fn test_validate_missing_input() {
        let cli = cli(&["/nonexistent/in.mp4"]);
        let err = validate(&cli, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_input(dir.path(), "in.mp4");
        let cli = cli(&[input.to_str().unwrap()]);
        let settings = Settings {
            mesh_confidence: 1.5,
            ..Settings::default()
        };
        let err = validate(&cli, &settings).unwrap_err();
        assert!(err.to_string().contains("Mesh confidence"));
    }

    #[test]
    fn test_validate_rejects_inverted_iris_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_input(dir.path(), "in.mp4");
        let cli = cli(&[input.to_str().unwrap()]);
        let settings = Settings {
            iris_left: 0.6,
            iris_right: 0.6,
            ..Settings::default()
        };
        assert!(validate(&cli, &settings).is_err());
    }

    #[test]
    fn test_validate_output_requires_image_input() {
        let dir = tempfile::tempdir().unwrap();
        let video = existing_input(dir.path(), "in.mp4");
        let image = existing_input(dir.path(), "in.jpg");

        let cli_video = cli(&[video.to_str().unwrap(), "--output", "out.png"]);
        assert!(validate(&cli_video, &Settings::default()).is_err());

        let cli_image = cli(&[image.to_str().unwrap(), "--output", "out.png"]);
        assert!(validate(&cli_image, &Settings::default()).is_ok());
    }

    #[test]
    fn test_output_conflicts_with_annotated_dir() {
        let result = Cli::try_parse_from([
            "gazeguard",
            "in.png",
            "--output",
            "out.png",
            "--annotated-dir",
            "frames",
        ]);
        assert!(result.is_err());
    }
}
