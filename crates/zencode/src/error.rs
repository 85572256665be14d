//! The error hierarchy surfaced by every stage of the pipeline.
//!
//! All error kinds named in `spec.md` §7 are variants of one flat
//! [`ZenError`] enum, following the plain `thiserror` idiom of
//! `zencode_patterns::PatternError` rather than a localized message
//! catalogue: a `ZenDSL` traceback is a developer diagnostic, not UI copy.

use crate::phase::Phase;
use thiserror::Error;
use zencode_patterns::PatternError;

/// Every kind of failure the parser and executor can produce.
///
/// All variants are fatal to the current run: `ZenDSL` has no in-script
/// recovery (`spec.md` §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZenError {
    /// The phase state machine rejected a transition.
    #[error("Invalid transition from {from} on '{attempted}'")]
    InvalidTransition {
        /// The phase the machine was in.
        from: Phase,
        /// The prefix that was attempted.
        attempted: String,
    },
    /// A line could not be classified at all (bad prefix, malformed quoting).
    #[error("invalid statement: {0}")]
    InvalidStatement(String),
    /// A line's candidate pattern matched nothing in the active registry.
    #[error("unknown step: {0}")]
    UnknownStep(String),
    /// A `Scenario` line named a plugin that could not be resolved or loaded.
    #[error("failed to load scenario '{0}'")]
    ScenarioLoadFailure(String),
    /// `pick`/`pickin` found no value for the requested key.
    #[error("not found: {0}")]
    NotFound(String),
    /// `validate` referenced a schema that is not registered.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),
    /// `validate` ran a schema and it rejected the value.
    #[error("schema '{name}' rejected the value: {reason}")]
    SchemaFailed {
        /// The schema that was applied.
        name: String,
        /// Why it failed.
        reason: String,
    },
    /// `Iam`/`ackmy` referenced identity state that is unset, already set, or malformed.
    #[error("identity error: {0}")]
    IdentityError(String),
    /// A built-in received an argument of the wrong shape (non-string, non-mapping, ...).
    #[error("type error: {0}")]
    TypeError(String),
    /// The JSON boundary rejected the input (decode failure, disallowed shape).
    #[error("codec error: {0}")]
    CodecError(String),
    /// A handler panicked; the executor caught the unwind and converted it.
    #[error("handler panicked: {0}")]
    HandlerPanicked(String),
}

impl From<PatternError> for ZenError {
    fn from(err: PatternError) -> Self {
        Self::InvalidStatement(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_invalid_transition() {
        let err = ZenError::InvalidTransition {
            from: Phase::Feature,
            attempted: "when".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid transition from feature on 'when'");
    }

    #[test]
    fn converts_pattern_error() {
        let err: ZenError = PatternError::UnterminatedQuote(3).into();
        assert!(matches!(err, ZenError::InvalidStatement(_)));
    }
}
