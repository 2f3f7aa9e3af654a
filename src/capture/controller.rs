use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default hold time before an automatic capture.
pub const DEFAULT_CAPTURE_DELAY: Duration = Duration::from_millis(3000);

/// How a manual trigger treats a countdown that is already running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualTriggerPolicy {
    /// Manual capture ends the countdown and returns to idle, like an
    /// automatic capture would.
    #[default]
    CancelCountdown,
    /// Manual capture leaves the countdown running; it can still fire later.
    PreserveCountdown,
}

/// What caused a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCause {
    Countdown,
    Manual,
}

/// A capture event emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub cause: TriggerCause,
    /// Timestamp of the update (or manual request) that fired.
    pub timestamp_us: u64,
}

/// Result of feeding one update into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    NoTrigger,
    Triggered(Trigger),
}

impl TriggerResult {
    pub fn is_triggered(&self) -> bool {
        matches!(self, Self::Triggered(_))
    }
}

/// Observable controller phase.
///
/// `Captured` only exists inside the update that fires; by the time the
/// update returns the controller is back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    Armed,
}

/// Countdown bookkeeping while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Countdown {
    armed_at_us: u64,
    previous_us: u64,
    elapsed: Duration,
}

/// Hands-raised countdown for a single tracked body.
///
/// Raising both hands arms the countdown. Once armed it runs to completion
/// regardless of hand position, fires once, and resets so the gesture can
/// be captured again.
#[derive(Debug, Clone)]
pub struct GestureCaptureController {
    delay: Duration,
    manual_policy: ManualTriggerPolicy,
    countdown: Option<Countdown>,
    last_timestamp_us: Option<u64>,
    hands_raised: bool,
}

impl GestureCaptureController {
    pub fn new(delay: Duration) -> Self {
        Self::with_policy(delay, ManualTriggerPolicy::default())
    }

    pub fn with_policy(delay: Duration, manual_policy: ManualTriggerPolicy) -> Self {
        Self {
            delay,
            manual_policy,
            countdown: None,
            last_timestamp_us: None,
            hands_raised: false,
        }
    }

    /// Advance the state machine by one frame.
    pub fn update(&mut self, hands_raised: bool, timestamp_us: u64) -> TriggerResult {
        self.hands_raised = hands_raised;
        self.last_timestamp_us = Some(timestamp_us);

        let Some(countdown) = self.countdown.as_mut() else {
            if hands_raised {
                tracing::debug!(timestamp_us, "hands raised, countdown armed");
                self.countdown = Some(Countdown {
                    armed_at_us: timestamp_us,
                    previous_us: timestamp_us,
                    elapsed: Duration::ZERO,
                });
            }
            return TriggerResult::NoTrigger;
        };

        if timestamp_us < countdown.previous_us {
            tracing::debug!(
                timestamp_us,
                previous_us = countdown.previous_us,
                "timestamp went backwards, delta clamped to zero"
            );
        }
        let delta_us = timestamp_us.saturating_sub(countdown.previous_us);
        countdown.elapsed += Duration::from_micros(delta_us);
        countdown.previous_us = timestamp_us;

        if countdown.elapsed < self.delay {
            return TriggerResult::NoTrigger;
        }

        tracing::debug!(
            timestamp_us,
            armed_at_us = countdown.armed_at_us,
            elapsed_ms = countdown.elapsed.as_millis() as u64,
            "countdown complete"
        );
        self.countdown = None;
        TriggerResult::Triggered(Trigger {
            cause: TriggerCause::Countdown,
            timestamp_us,
        })
    }

    /// Fire immediately, bypassing the countdown.
    pub fn trigger_manually(&mut self, timestamp_us: u64) -> TriggerResult {
        if self.manual_policy == ManualTriggerPolicy::CancelCountdown && self.countdown.is_some() {
            tracing::debug!("manual capture cancels running countdown");
            self.countdown = None;
        }
        TriggerResult::Triggered(Trigger {
            cause: TriggerCause::Manual,
            timestamp_us,
        })
    }

    /// Cancel any countdown and return to idle.
    pub fn reset(&mut self) {
        self.countdown = None;
        self.hands_raised = false;
    }

    pub fn phase(&self) -> CapturePhase {
        if self.countdown.is_some() {
            CapturePhase::Armed
        } else {
            CapturePhase::Idle
        }
    }

    pub fn is_countdown_started(&self) -> bool {
        self.countdown.is_some()
    }

    /// Hand state seen by the most recent update.
    pub fn hands_raised(&self) -> bool {
        self.hands_raised
    }

    /// Time accumulated by the running countdown, zero when idle.
    pub fn elapsed(&self) -> Duration {
        self.countdown.map_or(Duration::ZERO, |c| c.elapsed)
    }

    /// Seconds until capture, at millisecond resolution. Zero when idle.
    pub fn remaining_seconds(&self) -> f32 {
        match self.countdown {
            Some(countdown) => {
                let remaining = self.delay.saturating_sub(countdown.elapsed);
                remaining.as_millis() as f32 / 1000.0
            }
            None => 0.0,
        }
    }

    /// Overlay text such as `Snapshot in: 2.5`; empty when nothing is pending.
    pub fn countdown_text(&self) -> String {
        let remaining = self.remaining_seconds();
        if self.countdown.is_some() && remaining > 0.0 {
            format!("Snapshot in: {remaining:.1}")
        } else {
            String::new()
        }
    }

    pub fn capture_delay(&self) -> Duration {
        self.delay
    }

    pub fn manual_policy(&self) -> ManualTriggerPolicy {
        self.manual_policy
    }

    pub fn last_timestamp_us(&self) -> Option<u64> {
        self.last_timestamp_us
    }
}

impl Default for GestureCaptureController {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_DELAY)
    }
}
