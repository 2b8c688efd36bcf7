pub mod face_detector;
pub mod face_mesh;
pub mod landmark_provider;
