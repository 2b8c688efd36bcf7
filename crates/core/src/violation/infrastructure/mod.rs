pub mod csv_violation_log;
