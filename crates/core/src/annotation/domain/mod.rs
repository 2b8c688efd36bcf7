pub mod frame_annotator;
pub mod status_label;
