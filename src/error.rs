use thiserror::Error;

use crate::settings::store::SettingsError;
use crate::source::backend::SourceError;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, AppError>;
