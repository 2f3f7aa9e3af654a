use crate::joint::{Joint, JointId, JointPose, JOINT_COUNT};

/// One tracked body's skeleton at one sensor timestamp.
///
/// Joints are stored in a fixed array indexed by [`JointId`], so every frame
/// carries exactly [`JOINT_COUNT`] joints in identifier order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub body_id: u32,
    /// Device timestamp in microseconds.
    pub timestamp_us: u64,
    pub skeleton: [JointPose; JOINT_COUNT],
}

impl Frame {
    pub fn new(body_id: u32, timestamp_us: u64, skeleton: [JointPose; JOINT_COUNT]) -> Self {
        Self {
            body_id,
            timestamp_us,
            skeleton,
        }
    }

    /// Build a frame by asking `pose` for each joint in index order.
    pub fn from_fn(
        body_id: u32,
        timestamp_us: u64,
        mut pose: impl FnMut(JointId) -> JointPose,
    ) -> Self {
        Self::new(
            body_id,
            timestamp_us,
            std::array::from_fn(|i| pose(JointId::ALL[i])),
        )
    }

    pub fn pose(&self, id: JointId) -> &JointPose {
        &self.skeleton[id.index()]
    }

    pub fn pose_mut(&mut self, id: JointId) -> &mut JointPose {
        &mut self.skeleton[id.index()]
    }

    pub fn joint(&self, id: JointId) -> Joint {
        let pose = self.pose(id);
        Joint {
            id,
            position: pose.position,
            orientation: pose.orientation,
            confidence: pose.confidence,
        }
    }

    /// All joints in index order.
    pub fn joints(&self) -> impl Iterator<Item = Joint> + '_ {
        JointId::ALL.iter().map(move |&id| self.joint(id))
    }
}
