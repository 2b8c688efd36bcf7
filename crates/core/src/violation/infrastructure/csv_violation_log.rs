use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::violation::domain::violation::ViolationRecord;
use crate::violation::domain::violation_log::{ViolationLog, ViolationLogError};

pub const CSV_HEADER: &str = "timestamp,reason";

/// Two-column CSV file (`timestamp,reason`).
///
/// The file is opened, appended to and closed on every record. The header
/// is written only when the file is new or empty, so reopening a log from
/// an earlier run keeps a single header.
pub struct CsvViolationLog {
    path: PathBuf,
}

impl CsvViolationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_err(&self) -> impl FnOnce(std::io::Error) -> ViolationLogError + '_ {
        move |source| ViolationLogError::Append {
            path: self.path.clone(),
            source,
        }
    }
}

impl ViolationLog for CsvViolationLog {
    fn append(&mut self, record: &ViolationRecord) -> Result<(), ViolationLogError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ViolationLogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(self.append_err())?;
        let is_new = file.metadata().map_err(self.append_err())?.len() == 0;

        let mut out = String::new();
        if is_new {
            out.push_str(CSV_HEADER);
            out.push('\n');
        }
        out.push_str(&record.formatted_timestamp());
        out.push(',');
        out.push_str(&escape_field(&record.reason));
        out.push('\n');

        file.write_all(out.as_bytes()).map_err(self.append_err())?;
        file.flush().map_err(self.append_err())?;
        log::debug!("Logged violation: {}", record.reason);
        Ok(())
    }
}

/// Quotes a field containing a delimiter, quote or line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
