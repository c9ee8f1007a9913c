use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::entry::AuditEntry;
use crate::error::SinkError;
use crate::traits::AuditSink;

/// File-backed sink: one JSON object per line, append-only.
///
/// The file is opened in append mode and every write is flushed before
/// `append` returns, so an entry reported as committed survives the process.
/// Reads parse the whole file; a missing file reads as an empty ledger.
pub struct JsonlSink {
    path: PathBuf,
    writer: Mutex<File>,
}

impl JsonlSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlSink {
    fn append(&self, entry: &AuditEntry) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(entry)
            .map_err(|error| SinkError::Serialization(error.to_string()))?;
        line.push(b'\n');

        let mut file = self.writer.lock().map_err(|_| SinkError::LockPoisoned)?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<AuditEntry>, SinkError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|error| SinkError::Serialization(error.to_string()))
            })
            .collect()
    }
}
