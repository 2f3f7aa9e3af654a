// Run statistics.

pub mod stats;
