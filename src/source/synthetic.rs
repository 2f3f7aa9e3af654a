use std::time::Duration;

use pose_wire::{ConfidenceLevel, Frame, JointId, JointPose, Quat, Vec3};

use crate::source::backend::{PoseSource, Result};

/// Head height used by the synthetic body, in camera space (millimetres).
const HEAD_Y: f32 = -650.0;
const WRIST_DOWN_Y: f32 = 150.0;
const WRIST_UP_Y: f32 = -850.0;

/// A simulated person standing two metres from the sensor who raises both
/// hands for a while, then lowers them.
///
/// Used when no recording is configured, so the capture and streaming paths
/// can be exercised without hardware.
pub struct SyntheticSource {
    body_id: u32,
    frame_interval_us: u64,
    frame_count: u64,
    raise_from: Duration,
    raise_until: Duration,
    next: u64,
}

impl SyntheticSource {
    /// Intervals below one microsecond produce no frames.
    pub fn new(body_id: u32, frame_interval: Duration, total: Duration) -> Self {
        let frame_interval_us = u64::try_from(frame_interval.as_micros()).unwrap_or(u64::MAX);
        let frame_count = match frame_interval_us {
            0 => 0,
            us => u64::try_from(total.as_micros() / u128::from(us)).unwrap_or(u64::MAX),
        };
        Self {
            body_id,
            frame_interval_us,
            frame_count,
            raise_from: Duration::from_secs(1),
            raise_until: Duration::from_secs(2),
            next: 0,
        }
    }

    /// Hold both hands up during `[from, until)`.
    pub fn with_raise_window(mut self, from: Duration, until: Duration) -> Self {
        self.raise_from = from;
        self.raise_until = until;
        self
    }

    fn frame_at(&self, timestamp_us: u64) -> Frame {
        let elapsed = Duration::from_micros(timestamp_us);
        let raised = elapsed >= self.raise_from && elapsed < self.raise_until;
        let wrist_y = if raised { WRIST_UP_Y } else { WRIST_DOWN_Y };

        Frame::from_fn(self.body_id, timestamp_us, |id| {
            let position = match id {
                JointId::Head => Vec3::new(0.0, HEAD_Y, 2000.0),
                JointId::WristLeft => Vec3::new(-250.0, wrist_y, 1950.0),
                JointId::WristRight => Vec3::new(250.0, wrist_y, 1950.0),
                other => Vec3::new(0.0, other.index() as f32 * 20.0 - 300.0, 2000.0),
            };
            JointPose {
                position,
                orientation: Quat::IDENTITY,
                confidence: ConfidenceLevel::Medium,
            }
        })
    }
}

impl PoseSource for SyntheticSource {
    fn next_frames(&mut self) -> Result<Option<Vec<Frame>>> {
        if self.next >= self.frame_count {
            return Ok(None);
        }
        let timestamp_us = self.frame_interval_us.saturating_mul(self.next);
        self.next += 1;
        Ok(Some(vec![self.frame_at(timestamp_us)]))
    }
}
