pub mod annotation;
pub mod detection;
pub mod gaze;
pub mod pipeline;
pub mod shared;
pub mod video;
pub mod violation;
