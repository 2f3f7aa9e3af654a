use std::time::Instant;

/// Counters for one pipeline run: frames seen, frames streamed, captures.
pub struct PipelineStats {
    frame_count: u64,
    streamed_count: u64,
    drop_count: u64,
    total_bytes: u64,
    capture_count: u64,
    capture_failures: u64,
    start_time: Instant,
    last_timestamp_us: Option<u64>,
}

/// Point-in-time copy of pipeline stats for the end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub fps: f64,
    pub frame_count: u64,
    pub streamed_count: u64,
    pub drop_count: u64,
    pub drop_rate: f64,
    pub bandwidth_bps: u64,
    pub capture_count: u64,
    pub capture_failures: u64,
    pub last_timestamp_us: Option<u64>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            streamed_count: 0,
            drop_count: 0,
            total_bytes: 0,
            capture_count: 0,
            capture_failures: 0,
            start_time: Instant::now(),
            last_timestamp_us: None,
        }
    }

    /// Record a body frame entering the pipeline.
    pub fn record_frame(&mut self, timestamp_us: u64) {
        self.frame_count += 1;
        self.last_timestamp_us = Some(timestamp_us);
    }

    /// Record a frame written to the stream.
    pub fn record_streamed(&mut self, bytes: usize) {
        self.streamed_count += 1;
        self.total_bytes += bytes as u64;
    }

    /// Record a frame that could not be streamed.
    pub fn record_drop(&mut self) {
        self.drop_count += 1;
    }

    /// Record a fired capture and whether its snapshot was written.
    pub fn record_capture(&mut self, saved: bool) {
        self.capture_count += 1;
        if !saved {
            self.capture_failures += 1;
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn streamed_count(&self) -> u64 {
        self.streamed_count
    }

    pub fn drop_count(&self) -> u64 {
        self.drop_count
    }

    pub fn capture_count(&self) -> u64 {
        self.capture_count
    }

    /// Frames processed per wall-clock second.
    pub fn fps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0.0;
        }
        self.frame_count as f64 / elapsed
    }

    /// Stream drop rate as a percentage (0.0 - 100.0).
    pub fn drop_rate(&self) -> f64 {
        let total = self.streamed_count + self.drop_count;
        if total == 0 {
            return 0.0;
        }
        (self.drop_count as f64 / total as f64) * 100.0
    }

    /// Streamed bytes per second.
    pub fn bandwidth_bps(&self) -> u64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0;
        }
        (self.total_bytes as f64 / elapsed) as u64
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            fps: self.fps(),
            frame_count: self.frame_count,
            streamed_count: self.streamed_count,
            drop_count: self.drop_count,
            drop_rate: self.drop_rate(),
            bandwidth_bps: self.bandwidth_bps(),
            capture_count: self.capture_count,
            capture_failures: self.capture_failures,
            last_timestamp_us: self.last_timestamp_us,
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn initialises_with_zero_values() {
        let stats = PipelineStats::new();
        assert_eq!(stats.frame_count, 0);
        assert_eq!(stats.streamed_count, 0);
        assert_eq!(stats.drop_count, 0);
        assert_eq!(stats.total_bytes, 0);
        assert_eq!(stats.last_timestamp_us, None);
    }

    #[test]
    fn record_frame_tracks_latest_timestamp() {
        let mut stats = PipelineStats::new();
        stats.record_frame(100);
        stats.record_frame(200);
        assert_eq!(stats.frame_count(), 2);
        assert_eq!(stats.last_timestamp_us, Some(200));
    }

    #[test]
    fn record_streamed_accumulates_bytes() {
        let mut stats = PipelineStats::new();
        stats.record_streamed(1200);
        stats.record_streamed(800);
        assert_eq!(stats.streamed_count(), 2);
        assert_eq!(stats.total_bytes, 2000);
    }

    #[test]
    fn fps_is_positive_after_frames() {
        let mut stats = PipelineStats::new();
        for i in 0..30 {
            stats.record_frame(i * 33_333);
        }
        thread::sleep(Duration::from_millis(50));
        let fps = stats.fps();
        assert!(fps > 0.0, "fps should be positive, got {fps}");
    }

    #[test]
    fn drop_rate_returns_percentage() {
        let mut stats = PipelineStats::new();
        stats.record_streamed(10);
        stats.record_streamed(10);
        stats.record_drop();
        let rate = stats.drop_rate();
        assert!(
            (rate - 33.333).abs() < 1.0,
            "drop rate should be ~33%, got {rate}"
        );
    }

    #[test]
    fn drop_rate_zero_when_nothing_streamed() {
        let stats = PipelineStats::new();
        assert_eq!(stats.drop_rate(), 0.0);
    }

    #[test]
    fn bandwidth_bps_tracks_bytes() {
        let mut stats = PipelineStats::new();
        stats.record_streamed(10_000);
        thread::sleep(Duration::from_millis(50));
        let bps = stats.bandwidth_bps();
        assert!(bps > 0, "bandwidth should be positive, got {bps}");
    }

    #[test]
    fn record_capture_counts_failures() {
        let mut stats = PipelineStats::new();
        stats.record_capture(true);
        stats.record_capture(false);
        assert_eq!(stats.capture_count(), 2);
        assert_eq!(stats.capture_failures, 1);
    }

    #[test]
    fn snapshot_copies_counters() {
        let mut stats = PipelineStats::new();
        stats.record_frame(42);
        stats.record_streamed(100);
        stats.record_drop();
        stats.record_capture(false);
        let snap = stats.snapshot();
        assert_eq!(snap.frame_count, 1);
        assert_eq!(snap.streamed_count, 1);
        assert_eq!(snap.drop_count, 1);
        assert_eq!(snap.capture_count, 1);
        assert_eq!(snap.capture_failures, 1);
        assert_eq!(snap.last_timestamp_us, Some(42));
        assert!((snap.drop_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_without_frames_has_no_timestamp() {
        let snap = PipelineStats::new().snapshot();
        assert_eq!(snap.last_timestamp_us, None);
        assert_eq!(snap.drop_rate, 0.0);
    }
}
