use pose_wire::Frame;

use crate::capture::controller::{GestureCaptureController, Trigger, TriggerResult};
use crate::capture::error::PersistenceError;
use crate::capture::gesture::both_hands_raised;
use crate::capture::snapshot::{SnapshotArtifact, SnapshotWriter};
use crate::settings::types::CaptureSettings;

/// What happened to a frame fed into [`PoseCapture`].
#[derive(Debug)]
pub enum CaptureOutcome {
    /// No capture on this frame.
    Pending,
    /// A capture fired. The controller is already reset, whether or not the
    /// snapshot could be written.
    Captured {
        trigger: Trigger,
        result: Result<SnapshotArtifact, PersistenceError>,
    },
}

impl CaptureOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Captured { .. })
    }
}

/// Gesture capture for one tracked body: detection, countdown, persistence.
#[derive(Debug, Clone)]
pub struct PoseCapture {
    controller: GestureCaptureController,
    writer: SnapshotWriter,
}

impl PoseCapture {
    pub fn new(controller: GestureCaptureController, writer: SnapshotWriter) -> Self {
        Self { controller, writer }
    }

    pub fn from_settings(settings: &CaptureSettings) -> Self {
        Self::new(
            GestureCaptureController::with_policy(settings.delay(), settings.manual_trigger),
            SnapshotWriter::new(&settings.output_dir),
        )
    }

    /// Feed one frame of this body.
    pub fn update(&mut self, frame: &Frame) -> CaptureOutcome {
        let raised = both_hands_raised(frame);
        match self.controller.update(raised, frame.timestamp_us) {
            TriggerResult::NoTrigger => CaptureOutcome::Pending,
            TriggerResult::Triggered(trigger) => self.persist(trigger, frame),
        }
    }

    /// Capture `frame` now, regardless of gesture state.
    pub fn trigger_manually(&mut self, frame: &Frame) -> CaptureOutcome {
        match self.controller.trigger_manually(frame.timestamp_us) {
            TriggerResult::NoTrigger => CaptureOutcome::Pending,
            TriggerResult::Triggered(trigger) => self.persist(trigger, frame),
        }
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn controller(&self) -> &GestureCaptureController {
        &self.controller
    }

    pub fn writer(&self) -> &SnapshotWriter {
        &self.writer
    }

    fn persist(&self, trigger: Trigger, frame: &Frame) -> CaptureOutcome {
        let result = self.writer.write(frame);
        match &result {
            Ok(artifact) => tracing::info!(
                body_id = frame.body_id,
                cause = ?trigger.cause,
                "Pose snapshot saved to: {}",
                artifact.path.display()
            ),
            Err(e) => tracing::warn!(
                body_id = frame.body_id,
                cause = ?trigger.cause,
                "Failed to save pose snapshot: {e}"
            ),
        }
        CaptureOutcome::Captured { trigger, result }
    }
}
