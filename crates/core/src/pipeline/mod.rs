pub mod monitor_frame_use_case;
pub mod monitor_source_use_case;
pub mod pipeline_logger;
