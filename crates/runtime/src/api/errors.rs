//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from content loading and the core state machine so clients
//! can bubble them up with consistent context.
use thiserror::Error;

use thing_core::{ContentError, ErrorSeverity, GameError, StateError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("failed to load content")]
    Load(#[source] anyhow::Error),

    #[error("no template named '{0}'")]
    UnknownTemplate(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(err) => err.severity(),
            Self::Content(err) => err.severity(),
            Self::Load(_) | Self::UnknownTemplate(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(err) => err.error_code(),
            Self::Content(err) => err.error_code(),
            Self::Load(_) => "RUNTIME_LOAD",
            Self::UnknownTemplate(_) => "RUNTIME_UNKNOWN_TEMPLATE",
        }
    }
}

impl From<anyhow::Error> for RuntimeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Load(err)
    }
}
