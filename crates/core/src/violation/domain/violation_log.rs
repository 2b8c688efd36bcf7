use std::path::PathBuf;

use thiserror::Error;

use crate::violation::domain::violation::ViolationRecord;

#[derive(Error, Debug)]
pub enum ViolationLogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable, append-only store of violation rows.
///
/// Implementations never rewrite earlier rows. Concurrent writers are not
/// supported.
pub trait ViolationLog: Send {
    fn append(&mut self, record: &ViolationRecord) -> Result<(), ViolationLogError>;
}
