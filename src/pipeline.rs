use std::collections::HashMap;
use std::time::Duration;

use pose_wire::Frame;

use crate::capture::session::{CaptureOutcome, PoseCapture};
use crate::diagnostics::stats::{PipelineStats, StatsSnapshot};
use crate::settings::types::{CaptureSettings, Settings};
use crate::source::backend::{PoseSource, SourceError};
use crate::stream::{Connector, FrameStreamer, TcpConnector};

/// Longest pause inserted between captures when pacing a replay.
const MAX_REALTIME_GAP: Duration = Duration::from_secs(1);

/// The frame loop: every body frame goes to that body's [`PoseCapture`] and,
/// independently, to the [`FrameStreamer`].
///
/// A body missing from a sensor capture has lost tracking; its capture state
/// is discarded and a later frame with the same id starts from idle.
pub struct Pipeline<C: Connector = TcpConnector> {
    capture_settings: CaptureSettings,
    captures: HashMap<u32, PoseCapture>,
    latest: HashMap<u32, Frame>,
    streamer: Option<FrameStreamer<C>>,
    stats: PipelineStats,
    realtime: bool,
    previous_timestamp_us: Option<u64>,
}

impl Pipeline<TcpConnector> {
    /// Build from settings. Streaming is set up but not connected until
    /// [`start_streaming`](Pipeline::start_streaming).
    pub fn from_settings(settings: &Settings) -> Self {
        let streamer = settings
            .stream
            .enabled
            .then(|| FrameStreamer::from_settings(&settings.stream));
        let mut pipeline = Self::new(settings.capture.clone(), streamer);
        pipeline.realtime = settings.replay.realtime;
        pipeline
    }
}

impl<C: Connector> Pipeline<C> {
    pub fn new(capture_settings: CaptureSettings, streamer: Option<FrameStreamer<C>>) -> Self {
        Self {
            capture_settings,
            captures: HashMap::new(),
            latest: HashMap::new(),
            streamer,
            stats: PipelineStats::new(),
            realtime: false,
            previous_timestamp_us: None,
        }
    }

    /// Sleep between captures to reproduce the source's pace.
    pub fn set_realtime(&mut self, realtime: bool) {
        self.realtime = realtime;
    }

    /// Connect the streamer, if any. A failure is logged and capture
    /// continues without streaming.
    pub fn start_streaming(&mut self) -> bool {
        let Some(streamer) = self.streamer.as_mut() else {
            return false;
        };
        match streamer.initialize() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Streaming disabled: {e}");
                false
            }
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streamer.as_ref().is_some_and(|s| s.is_connected())
    }

    /// Handle one sensor capture. Returns the captures that fired.
    pub fn process(&mut self, frames: &[Frame]) -> Vec<CaptureOutcome> {
        self.captures
            .retain(|body_id, _| frames.iter().any(|f| f.body_id == *body_id));
        self.latest
            .retain(|body_id, _| frames.iter().any(|f| f.body_id == *body_id));

        let mut fired = Vec::new();
        for frame in frames {
            self.stats.record_frame(frame.timestamp_us);

            let settings = &self.capture_settings;
            let capture = self
                .captures
                .entry(frame.body_id)
                .or_insert_with(|| PoseCapture::from_settings(settings));
            let outcome = capture.update(frame);
            self.latest.insert(frame.body_id, frame.clone());
            fired.extend(self.record_outcome(outcome));

            self.stream(frame);
        }
        fired
    }

    /// Capture the most recent frame of `body_id` now. `None` if that body
    /// is not currently tracked or nothing was captured.
    pub fn trigger_manually(&mut self, body_id: u32) -> Option<CaptureOutcome> {
        let frame = self.latest.get(&body_id)?;
        let capture = self.captures.get_mut(&body_id)?;
        let outcome = capture.trigger_manually(frame);
        self.record_outcome(outcome)
    }

    /// Drain `source`, then close the stream. The summary is logged even
    /// when the source fails part way.
    pub fn run<S: PoseSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<StatsSnapshot, SourceError> {
        let result = self.drain(source);
        let summary = self.finish();
        result.map(|()| summary)
    }

    /// Close the stream and log the run summary, which is also returned.
    pub fn finish(&mut self) -> StatsSnapshot {
        if let Some(streamer) = self.streamer.as_mut() {
            streamer.close();
        }
        let summary = self.stats.snapshot();
        tracing::info!(
            frames = summary.frame_count,
            streamed = summary.streamed_count,
            dropped = summary.drop_count,
            drop_rate_pct = summary.drop_rate,
            bandwidth_bps = summary.bandwidth_bps,
            captures = summary.capture_count,
            capture_failures = summary.capture_failures,
            last_timestamp_us = ?summary.last_timestamp_us,
            "Pipeline finished at {:.1} fps",
            summary.fps
        );
        summary
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn capture(&self, body_id: u32) -> Option<&PoseCapture> {
        self.captures.get(&body_id)
    }

    /// Ids of the bodies in the last processed capture.
    pub fn tracked_bodies(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.captures.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn drain<S: PoseSource + ?Sized>(&mut self, source: &mut S) -> Result<(), SourceError> {
        while let Some(frames) = source.next_frames()? {
            if let Some(timestamp_us) = frames.first().map(|f| f.timestamp_us) {
                self.pace(timestamp_us);
            }
            self.process(&frames);
        }
        Ok(())
    }

    fn pace(&mut self, timestamp_us: u64) {
        if let Some(previous) = self.previous_timestamp_us.replace(timestamp_us) {
            if self.realtime {
                let gap = Duration::from_micros(timestamp_us.saturating_sub(previous));
                std::thread::sleep(gap.min(MAX_REALTIME_GAP));
            }
        }
    }

    fn stream(&mut self, frame: &Frame) {
        let Some(streamer) = self.streamer.as_mut() else {
            return;
        };
        if !streamer.is_connected() {
            return;
        }
        match streamer.send(frame) {
            Ok(bytes) => self.stats.record_streamed(bytes),
            Err(e) => {
                self.stats.record_drop();
                tracing::warn!("Streaming stopped: {e}");
            }
        }
    }

    fn record_outcome(&mut self, outcome: CaptureOutcome) -> Option<CaptureOutcome> {
        let saved = match &outcome {
            CaptureOutcome::Pending => return None,
            CaptureOutcome::Captured { result, .. } => result.is_ok(),
        };
        self.stats.record_capture(saved);
        Some(outcome)
    }
}
