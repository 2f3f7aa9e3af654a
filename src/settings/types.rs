use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::controller::ManualTriggerPolicy;

/// Gesture capture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureSettings {
    /// Hold time before an automatic capture, in milliseconds.
    pub delay_ms: u64,
    /// Directory snapshots are written to.
    pub output_dir: PathBuf,
    pub manual_trigger: ManualTriggerPolicy,
}

impl CaptureSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            output_dir: PathBuf::from("."),
            manual_trigger: ManualTriggerPolicy::default(),
        }
    }
}

/// Frame streaming destination and transport options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Upper bound on each connect attempt; `None` or 0 uses the OS default.
    pub connect_timeout_ms: Option<u64>,
    /// Upper bound on a blocked send; `None` or 0 blocks indefinitely.
    pub write_timeout_ms: Option<u64>,
}

impl StreamSettings {
    pub fn connect_timeout(&self) -> Option<Duration> {
        timeout(self.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        timeout(self.write_timeout_ms)
    }
}

// Sockets reject a zero timeout, so 0 means no timeout.
fn timeout(ms: Option<u64>) -> Option<Duration> {
    ms.filter(|&ms| ms > 0).map(Duration::from_millis)
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8888,
            connect_timeout_ms: None,
            write_timeout_ms: None,
        }
    }
}

/// Recorded-session playback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplaySettings {
    /// JSON-lines recording to play back.
    pub path: Option<PathBuf>,
    /// Sleep between frames to reproduce the recorded pace.
    pub realtime: bool,
}

/// Top-level settings file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub capture: CaptureSettings,
    pub stream: StreamSettings,
    pub replay: ReplaySettings,
}
