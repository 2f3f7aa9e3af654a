use std::path::PathBuf;

use thiserror::Error;

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not create snapshot directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not serialise snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write snapshot file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not move snapshot into place at {}: {source}", .path.display())]
    Rename {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, PersistenceError>;
