pub mod capture;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod settings;
pub mod source;
pub mod stream;

use std::time::Duration;

use crate::diagnostics::stats::StatsSnapshot;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::settings::types::Settings;
use crate::source::backend::PoseSource;
use crate::source::replay::ReplaySource;
use crate::source::synthetic::SyntheticSource;

/// Play the configured recording (or a synthetic session when none is set)
/// through capture and streaming, returning the run summary.
pub fn run(settings: &Settings) -> Result<StatsSnapshot> {
    let mut source: Box<dyn PoseSource> = match &settings.replay.path {
        Some(path) => {
            tracing::info!("Replaying {}", path.display());
            Box::new(ReplaySource::open(path)?)
        }
        None => {
            tracing::info!("No recording configured, running synthetic session");
            Box::new(SyntheticSource::new(
                1,
                Duration::from_micros(33_333),
                Duration::from_secs(5),
            ))
        }
    };

    let mut pipeline = Pipeline::from_settings(settings);
    pipeline.start_streaming();
    Ok(pipeline.run(source.as_mut())?)
}
