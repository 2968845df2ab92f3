//! Durable storage for collected records
//!
//! A single human-readable JSON artifact holds the full store in insertion
//! order. Every write is a full rewrite through a temp file and rename, so a
//! crash mid-write never leaves a truncated artifact behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::record::FloorSheetRecord;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The artifact exists but is not a valid record sequence. The session
    /// must not guess at partial recovery; surrounding tooling decides
    /// whether to delete or repair the file.
    #[error("prior data in {path} is not a valid record sequence: {source}")]
    MalformedPriorState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the persisted record sequence, or an empty one if no artifact exists
/// yet.
pub fn load_records(path: &Path) -> Result<Vec<FloorSheetRecord>, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_owned(),
                source,
            });
        }
    };

    serde_json::from_str(&raw).map_err(|source| StorageError::MalformedPriorState {
        path: path.to_owned(),
        source,
    })
}

/// Rewrite the artifact with the full record sequence, in insertion order.
pub fn persist_records(path: &Path, records: &[FloorSheetRecord]) -> Result<(), StorageError> {
    let write_err = |source: io::Error| StorageError::Write {
        path: path.to_owned(),
        source,
    };

    let json =
        serde_json::to_string_pretty(records).map_err(|e| write_err(io::Error::other(e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;

    debug!(path = %path.display(), records = records.len(), "persisted record store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(contract_no: &str) -> FloorSheetRecord {
        FloorSheetRecord::from_cells(&[
            "1".to_owned(),
            contract_no.to_owned(),
            "NABIL".to_owned(),
            "34".to_owned(),
            "57".to_owned(),
            "100".to_owned(),
            "512.00".to_owned(),
            "51200.00".to_owned(),
        ])
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let loaded = load_records(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn persist_then_load_round_trips_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("floorsheet.json");
        let records = vec![record("C-2"), record("C-1"), record("C-3")];

        persist_records(&path, &records).unwrap();
        let loaded = load_records(&path).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn malformed_artifact_is_a_distinct_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("floorsheet.json");
        fs::write(&path, "{ not an array").unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, StorageError::MalformedPriorState { .. }));
    }

    #[test]
    fn artifact_uses_historical_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("floorsheet.json");

        persist_records(&path, &[record("C-1")]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();

        assert!(raw.contains("\"Contract No.\""));
        assert!(raw.contains("\"Rate (Rs)\""));
        assert!(raw.contains("\"Amount (Rs)\""));
        // Pretty-printed, one field per line.
        assert!(raw.contains('\n'));
    }

    #[test]
    fn persist_overwrites_the_previous_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("floorsheet.json");

        persist_records(&path, &[record("C-1")]).unwrap();
        persist_records(&path, &[record("C-1"), record("C-2")]).unwrap();

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn persist_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/floorsheet.json");

        persist_records(&path, &[record("C-1")]).unwrap();
        assert_eq!(load_records(&path).unwrap().len(), 1);
    }
}
