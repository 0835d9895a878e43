//! State table and world errors.
//!
//! Errors related to table construction, entity management, and capacity limits.

use crate::error::{ErrorSeverity, GameError};
use crate::state::StateNum;
use crate::thing::TemplateId;

/// Errors raised while building tables or mutating the live world.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Table has no entries (index 0 must hold the null state).
    #[error("state table is empty")]
    EmptyTable,

    /// A state references a successor outside the table.
    #[error("state '{name}' points to {next} but the table holds {len} states")]
    NextOutOfRange {
        name: String,
        next: StateNum,
        len: usize,
    },

    /// Two states share a mnemonic.
    #[error("duplicate state name '{0}'")]
    DuplicateName(String),

    /// Two states share a DeHackEd number.
    #[error("duplicate DeHackEd number {0}")]
    DuplicateDehNum(i32),

    /// Lookup of a state index that does not exist.
    #[error("{0} is not in the state table")]
    UnknownState(StateNum),

    /// Lookup of a template id that does not exist.
    #[error("template {0:?} is not registered")]
    UnknownTemplate(TemplateId),

    /// State carries more static arguments than a frame can hold.
    #[error("state '{name}' has {count} arguments (max: {max})")]
    TooManyArgs {
        name: String,
        count: usize,
        max: usize,
    },

    /// Template has no spawn state, so a thing of it would dissolve at once.
    #[error("template '{0}' has no spawn state")]
    NullSpawnState(String),

    /// World already holds the configured maximum number of things.
    #[error("thing limit reached (max: {max})")]
    ThingLimit { max: usize },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            EmptyTable
            | NextOutOfRange { .. }
            | DuplicateName(_)
            | DuplicateDehNum(_)
            | TooManyArgs { .. }
            | UnknownTemplate(_)
            | NullSpawnState(_) => ErrorSeverity::Validation,

            UnknownState(_) => ErrorSeverity::Internal,

            ThingLimit { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            EmptyTable => "STATE_EMPTY_TABLE",
            NextOutOfRange { .. } => "STATE_NEXT_OUT_OF_RANGE",
            DuplicateName(_) => "STATE_DUPLICATE_NAME",
            DuplicateDehNum(_) => "STATE_DUPLICATE_DEHNUM",
            UnknownState(_) => "STATE_UNKNOWN_STATE",
            UnknownTemplate(_) => "STATE_UNKNOWN_TEMPLATE",
            TooManyArgs { .. } => "STATE_TOO_MANY_ARGS",
            NullSpawnState(_) => "STATE_NULL_SPAWN",
            ThingLimit { .. } => "STATE_THING_LIMIT",
        }
    }
}
