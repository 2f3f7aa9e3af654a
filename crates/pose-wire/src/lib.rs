//! Skeleton frame model and the line-delimited record format used to
//! stream frames and persist pose snapshots.

pub mod error;
pub mod frame;
pub mod joint;
pub mod record;

pub use error::RecordError;
pub use frame::Frame;
pub use joint::{
    joint_name, ConfidenceLevel, Joint, JointId, JointPose, Quat, Vec3, JOINT_COUNT,
    UNKNOWN_JOINT_NAME,
};
pub use record::{
    decode_frame, decode_record, encode_frame, encode_record, joint_records, FrameRecord,
    JointRecord, RecordReader, RECORD_DELIMITER,
};
