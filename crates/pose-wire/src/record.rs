//! Line-delimited JSON records.
//!
//! Every frame travels as one compact JSON object followed by a single
//! `\n`. Compact serde_json output never contains a raw line break, so a
//! receiver only has to split on newlines.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};
use crate::frame::Frame;
use crate::joint::{joint_name, ConfidenceLevel, Joint, JointPose, Quat, Vec3, JOINT_COUNT};

/// Record terminator.
pub const RECORD_DELIMITER: u8 = b'\n';

/// One joint as it appears in stream records and snapshot files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointRecord {
    pub joint_id: u32,
    pub joint_name: String,
    pub position: Vec3,
    pub orientation: Quat,
    pub confidence_level: i32,
}

impl From<Joint> for JointRecord {
    fn from(joint: Joint) -> Self {
        Self {
            joint_id: joint.id.index() as u32,
            joint_name: joint.name().to_string(),
            position: joint.position,
            orientation: joint.orientation,
            confidence_level: joint.confidence.code(),
        }
    }
}

impl JointRecord {
    /// Build a record for a raw joint id, naming it from the joint table.
    pub fn with_id(
        joint_id: u32,
        position: Vec3,
        orientation: Quat,
        confidence_level: i32,
    ) -> Self {
        Self {
            joint_id,
            joint_name: joint_name(joint_id).to_string(),
            position,
            orientation,
            confidence_level,
        }
    }
}

/// Serialise all joints of a frame in index order.
pub fn joint_records(frame: &Frame) -> Vec<JointRecord> {
    frame.joints().map(JointRecord::from).collect()
}

/// One streamed frame. `timestamp` is the raw device time in microseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub body_id: u32,
    pub timestamp: u64,
    pub joints: Vec<JointRecord>,
}

impl From<&Frame> for FrameRecord {
    fn from(frame: &Frame) -> Self {
        Self {
            body_id: frame.body_id,
            timestamp: frame.timestamp_us,
            joints: joint_records(frame),
        }
    }
}

impl TryFrom<FrameRecord> for Frame {
    type Error = RecordError;

    fn try_from(record: FrameRecord) -> Result<Self> {
        if record.joints.len() != JOINT_COUNT {
            return Err(RecordError::JointCount {
                expected: JOINT_COUNT,
                found: record.joints.len(),
            });
        }

        let mut skeleton = [JointPose::default(); JOINT_COUNT];
        for (index, joint) in record.joints.iter().enumerate() {
            if joint.joint_id as usize != index {
                return Err(RecordError::JointOrder {
                    index,
                    found: joint.joint_id,
                });
            }
            let confidence = ConfidenceLevel::from_code(joint.confidence_level.into()).ok_or(
                RecordError::Confidence {
                    joint_id: joint.joint_id,
                    code: joint.confidence_level,
                },
            )?;
            skeleton[index] = JointPose {
                position: joint.position,
                orientation: joint.orientation,
                confidence,
            };
        }

        Ok(Frame::new(record.body_id, record.timestamp, skeleton))
    }
}

/// Encode a record as compact JSON plus the line terminator.
pub fn encode_record(record: &FrameRecord) -> Result<Vec<u8>> {
    let mut buf = serde_json::to_vec(record)?;
    buf.push(RECORD_DELIMITER);
    Ok(buf)
}

/// Encode a frame as one wire record.
///
/// Non-finite coordinates are written as `null`, which [`decode_frame`]
/// rejects; only frames with finite values survive a round trip.
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>> {
    encode_record(&FrameRecord::from(frame))
}

/// Decode a single line. A trailing `\n` or `\r\n` is ignored.
pub fn decode_record(line: &str) -> Result<FrameRecord> {
    let line = line.trim_end_matches(['\n', '\r']);
    Ok(serde_json::from_str(line)?)
}

/// Decode a single line straight into a validated [`Frame`].
pub fn decode_frame(line: &str) -> Result<Frame> {
    Frame::try_from(decode_record(line)?)
}

/// Reads records from a line-delimited stream.
///
/// Blank lines are skipped. A line that is not UTF-8 or not a record yields
/// an error and reading carries on with the next line. Iteration ends at end
/// of input.
pub struct RecordReader<R> {
    inner: R,
    line: Vec<u8>,
    line_number: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
            line_number: 0,
        }
    }

    /// 1-based number of the last line read.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read the next record and validate it as a full frame.
    pub fn next_frame(&mut self) -> Option<Result<Frame>> {
        self.next().map(|record| record.and_then(Frame::try_from))
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.inner.read_until(RECORD_DELIMITER, &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = match std::str::from_utf8(&self.line) {
                        Ok(line) => line,
                        Err(e) => return Some(Err(RecordError::Utf8(e))),
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(decode_record(line));
                }
                Err(e) => return Some(Err(RecordError::Io(e))),
            }
        }
    }
}
