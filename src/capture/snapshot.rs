use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use pose_wire::{joint_records, Frame, JointRecord};
use serde::{Deserialize, Serialize};

use crate::capture::error::{PersistenceError, Result};

/// On-disk snapshot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub body_id: u32,
    /// Capture-time label; also the artifact's file name.
    pub timestamp: String,
    pub joints: Vec<JointRecord>,
}

/// A snapshot that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotArtifact {
    pub path: PathBuf,
    pub label: String,
    pub body_id: u32,
}

/// File name for a capture taken at `time`, at second resolution.
pub fn snapshot_label<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("pose_snapshot_%Y%m%d_%H%M%S.json").to_string()
}

/// Persists the triggering frame of a capture as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write a snapshot labelled with the current local time.
    pub fn write(&self, frame: &Frame) -> Result<SnapshotArtifact> {
        self.write_at(frame, &Local::now())
    }

    /// Write a snapshot labelled with `time`.
    ///
    /// A capture in the same second as an earlier one replaces it.
    pub fn write_at<Tz: TimeZone>(
        &self,
        frame: &Frame,
        time: &DateTime<Tz>,
    ) -> Result<SnapshotArtifact>
    where
        Tz::Offset: fmt::Display,
    {
        let label = snapshot_label(time);
        let record = SnapshotRecord {
            body_id: frame.body_id,
            timestamp: label.clone(),
            joints: joint_records(frame),
        };
        let mut json = serde_json::to_string_pretty(&record)?;
        json.push('\n');

        std::fs::create_dir_all(&self.output_dir).map_err(|source| {
            PersistenceError::CreateDir {
                path: self.output_dir.clone(),
                source,
            }
        })?;

        // Write .tmp then rename so readers never see a partial file.
        let path = self.output_dir.join(&label);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|source| PersistenceError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        if let Err(source) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(PersistenceError::Rename { path, source });
        }

        Ok(SnapshotArtifact {
            path,
            label,
            body_id: frame.body_id,
        })
    }

    /// Load a previously written snapshot.
    pub fn read(path: &Path) -> Result<SnapshotRecord> {
        let contents = std::fs::read_to_string(path).map_err(|source| PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| PersistenceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for SnapshotWriter {
    fn default() -> Self {
        Self::new(".")
    }
}
