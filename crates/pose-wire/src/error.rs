use thiserror::Error;

/// Record encoding and decoding errors.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record has {found} joints, expected {expected}")]
    JointCount { expected: usize, found: usize },

    #[error("joint at index {index} has id {found}")]
    JointOrder { index: usize, found: u32 },

    #[error("joint {joint_id} has unknown confidence level {code}")]
    Confidence { joint_id: u32, code: i32 },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, RecordError>;
