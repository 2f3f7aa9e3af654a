use pose_wire::Frame;
use thiserror::Error;

/// Pose source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not open recording {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("bad record on line {line}: {source}")]
    Record {
        line: u64,
        source: pose_wire::RecordError,
    },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Supplier of body-tracking frames.
///
/// Each call returns every body tracked in one sensor capture, or `None`
/// once the source is exhausted.
pub trait PoseSource {
    fn next_frames(&mut self) -> Result<Option<Vec<Frame>>>;
}
