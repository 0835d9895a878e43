//! Common error infrastructure for thing-core.
//!
//! Domain-specific errors (`StateError`, `ContentError`) live next to the
//! modules that raise them and implement [`GameError`] for uniform
//! classification.
//!
//! Content problems inside action arguments are deliberately *not* errors:
//! malformed arguments degrade to no-ops at the point of use so that imperfect
//! game content never aborts the process.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: unknown template id, unresolvable next-state name
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: live thing referencing a state outside the table
    Internal,

    /// Unrecoverable, the world cannot continue.
    ///
    /// Examples: arena capacity exhausted
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all thing-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while turning raw content into validated tables.
///
/// Problems inside action *arguments* never surface here; see the module
/// docs. These variants cover structural mistakes that leave the tables
/// unusable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// A state names an action the registry does not provide.
    #[error("state '{state}' uses unknown action '{action}'")]
    UnknownAction { state: String, action: String },

    /// A state's `next` names no existing state.
    #[error("state '{state}' has unresolved next state '{next}'")]
    UnresolvedNext { state: String, next: String },

    /// A template slot or label names no existing state.
    #[error("template '{template}' slot '{slot}' names unknown state '{state}'")]
    UnresolvedSlot {
        template: String,
        slot: String,
        state: String,
    },

    /// Unrecognized state slot name in template content.
    #[error("unknown state slot '{0}'")]
    UnknownSlot(String),

    /// Unrecognized flag mnemonic.
    #[error("unknown thing flag '{0}'")]
    UnknownFlag(String),

    /// Two templates share a name.
    #[error("duplicate template '{0}'")]
    DuplicateTemplate(String),

    /// More templates than a `TemplateId` can address.
    #[error("too many templates (max: {max})")]
    TooManyTemplates { max: usize },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ContentError::*;
        match self {
            UnknownAction { .. } => "CONTENT_UNKNOWN_ACTION",
            UnresolvedNext { .. } => "CONTENT_UNRESOLVED_NEXT",
            UnresolvedSlot { .. } => "CONTENT_UNRESOLVED_SLOT",
            UnknownSlot(_) => "CONTENT_UNKNOWN_SLOT",
            UnknownFlag(_) => "CONTENT_UNKNOWN_FLAG",
            DuplicateTemplate(_) => "CONTENT_DUPLICATE_TEMPLATE",
            TooManyTemplates { .. } => "CONTENT_TOO_MANY_TEMPLATES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_errors_are_validation_failures() {
        let err = ContentError::UnknownAction {
            state: "S_X".into(),
            action: "A_Nope".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_internal());
        assert_eq!(err.error_code(), "CONTENT_UNKNOWN_ACTION");
        assert_eq!(err.to_string(), "state 'S_X' uses unknown action 'A_Nope'");
    }
}
