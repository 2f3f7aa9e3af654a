// Settings file and its defaults.

pub mod store;
pub mod types;
