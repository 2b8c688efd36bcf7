/// BlazeFace short-range detector (128x128 input, 896 anchors).
pub const DETECTOR_MODEL_NAME: &str = "face_detection_short_range.onnx";

/// Face-mesh landmark model with refined iris points (192x192 input, 478 points).
pub const FACE_MESH_MODEL_NAME: &str = "face_landmark_with_iris.onnx";

/// Directory name used under the platform cache/config dirs.
pub const APP_DIR_NAME: &str = "GazeGuard";

pub const DEFAULT_LOG_FILE: &str = "violations.csv";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

// Face-mesh topology indices.
pub const NOSE_TIP: usize = 1;
pub const LEFT_EYE_OUTER: usize = 33;
pub const LEFT_EYE_INNER: usize = 133;
pub const RIGHT_EYE_INNER: usize = 362;
pub const RIGHT_EYE_OUTER: usize = 263;
pub const LEFT_IRIS_CENTER: usize = 468;
pub const RIGHT_IRIS_CENTER: usize = 473;

/// 468 mesh points followed by 10 refined iris points.
pub const FACE_MESH_POINTS: usize = 478;
