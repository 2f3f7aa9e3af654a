use pose_wire::{Frame, JointId};

/// Whether both wrists are above the head.
///
/// Camera space has `+y` pointing towards the ground, so "above" means a
/// smaller `y`.
pub fn both_hands_raised(frame: &Frame) -> bool {
    let head_y = frame.pose(JointId::Head).position.y;
    let left_y = frame.pose(JointId::WristLeft).position.y;
    let right_y = frame.pose(JointId::WristRight).position.y;
    left_y < head_y && right_y < head_y
}
