//! Flat-file record store
//!
//! The store owns the canonical on-disk copy of session memory. Callers work on
//! an in-memory `Vec<Record>` and must call [`RecordStore::save`] after mutating
//! it. There is no locking: two processes writing the same file can lose
//! updates.

use super::Record;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON file holding every record, in order
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records
    ///
    /// A missing file or content that is not a well-formed record list yields an
    /// empty history. Other I/O failures are returned.
    pub fn load(&self) -> Result<Vec<Record>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read memory store {}", self.path.display()))
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                log::warn!(
                    "memory store {} is malformed, treating as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the store with `records`
    ///
    /// Writes a sibling temp file and renames it over the target.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let content = to_json(records)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        log::info!("saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Load, append one record, save; returns the updated list
    pub fn append(&self, record: Record) -> Result<Vec<Record>> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)?;
        Ok(records)
    }
}

/// Four-space indented JSON, non-ASCII written as-is
fn to_json(records: &[Record]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records
        .serialize(&mut ser)
        .context("Failed to serialize records")?;
    Ok(out)
}
