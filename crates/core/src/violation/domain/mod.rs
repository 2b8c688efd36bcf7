pub mod violation;
pub mod violation_log;
