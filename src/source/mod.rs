// Pose sources: where frames come from.

pub mod backend;
pub mod replay;
pub mod synthetic;
