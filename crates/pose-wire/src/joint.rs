use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of joints reported per tracked body.
pub const JOINT_COUNT: usize = 32;

/// Name reported for joint identifiers outside the sensor's table.
pub const UNKNOWN_JOINT_NAME: &str = "UNKNOWN";

/// Body-tracking joint, indexed the way the sensor SDK indexes its skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum JointId {
    Pelvis = 0,
    SpineNavel,
    SpineChest,
    Neck,
    ClavicleLeft,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    HandtipLeft,
    ThumbLeft,
    ClavicleRight,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HandtipRight,
    ThumbRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    Head,
    Nose,
    EyeLeft,
    EarLeft,
    EyeRight,
    EarRight,
}

impl JointId {
    /// Every joint in index order.
    pub const ALL: [JointId; JOINT_COUNT] = [
        Self::Pelvis,
        Self::SpineNavel,
        Self::SpineChest,
        Self::Neck,
        Self::ClavicleLeft,
        Self::ShoulderLeft,
        Self::ElbowLeft,
        Self::WristLeft,
        Self::HandLeft,
        Self::HandtipLeft,
        Self::ThumbLeft,
        Self::ClavicleRight,
        Self::ShoulderRight,
        Self::ElbowRight,
        Self::WristRight,
        Self::HandRight,
        Self::HandtipRight,
        Self::ThumbRight,
        Self::HipLeft,
        Self::KneeLeft,
        Self::AnkleLeft,
        Self::FootLeft,
        Self::HipRight,
        Self::KneeRight,
        Self::AnkleRight,
        Self::FootRight,
        Self::Head,
        Self::Nose,
        Self::EyeLeft,
        Self::EarLeft,
        Self::EyeRight,
        Self::EarRight,
    ];

    /// Position of this joint in a skeleton array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a joint by its numeric identifier.
    ///
    /// Returns `None` for identifiers outside `0..JOINT_COUNT`.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Canonical upper-snake-case name, as written to records and snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pelvis => "PELVIS",
            Self::SpineNavel => "SPINE_NAVEL",
            Self::SpineChest => "SPINE_CHEST",
            Self::Neck => "NECK",
            Self::ClavicleLeft => "CLAVICLE_LEFT",
            Self::ShoulderLeft => "SHOULDER_LEFT",
            Self::ElbowLeft => "ELBOW_LEFT",
            Self::WristLeft => "WRIST_LEFT",
            Self::HandLeft => "HAND_LEFT",
            Self::HandtipLeft => "HANDTIP_LEFT",
            Self::ThumbLeft => "THUMB_LEFT",
            Self::ClavicleRight => "CLAVICLE_RIGHT",
            Self::ShoulderRight => "SHOULDER_RIGHT",
            Self::ElbowRight => "ELBOW_RIGHT",
            Self::WristRight => "WRIST_RIGHT",
            Self::HandRight => "HAND_RIGHT",
            Self::HandtipRight => "HANDTIP_RIGHT",
            Self::ThumbRight => "THUMB_RIGHT",
            Self::HipLeft => "HIP_LEFT",
            Self::KneeLeft => "KNEE_LEFT",
            Self::AnkleLeft => "ANKLE_LEFT",
            Self::FootLeft => "FOOT_LEFT",
            Self::HipRight => "HIP_RIGHT",
            Self::KneeRight => "KNEE_RIGHT",
            Self::AnkleRight => "ANKLE_RIGHT",
            Self::FootRight => "FOOT_RIGHT",
            Self::Head => "HEAD",
            Self::Nose => "NOSE",
            Self::EyeLeft => "EYE_LEFT",
            Self::EarLeft => "EAR_LEFT",
            Self::EyeRight => "EYE_RIGHT",
            Self::EarRight => "EAR_RIGHT",
        }
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name for a raw joint identifier, falling back to `UNKNOWN`.
pub fn joint_name(index: u32) -> &'static str {
    JointId::from_index(index).map_or(UNKNOWN_JOINT_NAME, JointId::name)
}

/// Tracking confidence the sensor attaches to each joint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum ConfidenceLevel {
    /// Joint is out of range (too far from the depth camera).
    #[default]
    None = 0,
    /// Joint is not observed (likely occluded); position is predicted.
    Low = 1,
    /// Joint is observed with medium confidence.
    Medium = 2,
    /// Reserved by the sensor SDK for future high-confidence estimates.
    High = 3,
}

impl ConfidenceLevel {
    /// Integer code used on the wire.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parse a wire code. Returns `None` for codes outside the enumeration.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }
}

/// Position in camera space, in millimetres. `+y` points towards the ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Joint orientation as a unit quaternion. Serialised in `w, x, y, z` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Pose of a single joint; its identity comes from its slot in the skeleton.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub confidence: ConfidenceLevel,
}

/// A joint together with its identifier, as yielded by [`crate::Frame::joints`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub id: JointId,
    pub position: Vec3,
    pub orientation: Quat,
    pub confidence: ConfidenceLevel,
}

impl Joint {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, id) in JointId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn from_index_covers_the_table() {
        assert_eq!(JointId::from_index(0), Some(JointId::Pelvis));
        assert_eq!(JointId::from_index(7), Some(JointId::WristLeft));
        assert_eq!(JointId::from_index(14), Some(JointId::WristRight));
        assert_eq!(JointId::from_index(26), Some(JointId::Head));
        assert_eq!(JointId::from_index(31), Some(JointId::EarRight));
        assert_eq!(JointId::from_index(32), None);
        assert_eq!(JointId::from_index(u32::MAX), None);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = JointId::ALL.iter().map(|j| j.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), JOINT_COUNT);
    }

    #[test]
    fn joint_name_falls_back_to_unknown() {
        assert_eq!(joint_name(26), "HEAD");
        assert_eq!(joint_name(9), "HANDTIP_LEFT");
        assert_eq!(joint_name(99), UNKNOWN_JOINT_NAME);
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(JointId::SpineChest.to_string(), "SPINE_CHEST");
    }

    #[test]
    fn confidence_codes_match_sensor_values() {
        assert_eq!(ConfidenceLevel::None.code(), 0);
        assert_eq!(ConfidenceLevel::Low.code(), 1);
        assert_eq!(ConfidenceLevel::Medium.code(), 2);
        assert_eq!(ConfidenceLevel::High.code(), 3);
        for level in [
            ConfidenceLevel::None,
            ConfidenceLevel::Low,
            ConfidenceLevel::Medium,
            ConfidenceLevel::High,
        ] {
            assert_eq!(ConfidenceLevel::from_code(level.code().into()), Some(level));
        }
        assert_eq!(ConfidenceLevel::from_code(4), None);
        assert_eq!(ConfidenceLevel::from_code(-1), None);
    }

    #[test]
    fn default_pose_is_untracked_identity() {
        let pose = JointPose::default();
        assert_eq!(pose.orientation, Quat::IDENTITY);
        assert_eq!(pose.confidence, ConfidenceLevel::None);
    }
}
