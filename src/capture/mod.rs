// Capture: hands-raised detection, countdown, snapshots.

pub mod controller;
pub mod error;
pub mod gesture;
pub mod session;
pub mod snapshot;
