//! Error taxonomy of the engine.
//!
//! - [`SchemaError`]: raised once while compiling schemas into plans; no plan
//!   set is produced.
//! - [`ExecutionError`]: aborts a single validation call (a custom predicate
//!   failed, the schema is unknown, the value could not be snapshotted).
//! - [`ValidateError`]: what [`Validator::validate_or_throw`] returns, the
//!   aggregate rule failure or an execution error.
//! - [`PredicateError`]: the error a custom predicate reports when its own
//!   logic breaks, as opposed to the value being invalid.
//!
//! Rule failures themselves are never errors; they become messages in
//! [`ValidationErrors`].
//!
//! [`Validator::validate_or_throw`]: crate::engine::Validator::validate_or_throw

use std::error::Error as StdError;

use crate::foundation::ValidationErrors;
use crate::pattern::RejectReason;

// ============================================================================
// SCHEMA ERRORS
// ============================================================================

/// A schema set could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The pattern safety analyzer rejected a pattern.
    #[error("{schema}.{field}: unsafe pattern `{pattern}`: {message}")]
    UnsafePattern {
        schema: String,
        field: String,
        pattern: String,
        reason: RejectReason,
        message: String,
    },

    /// The regex engine could not compile a pattern.
    #[error("{schema}.{field}: invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        schema: String,
        field: String,
        pattern: String,
        message: String,
    },

    /// A custom predicate name is not registered.
    #[error("{schema}.{field}: unresolved custom predicate `{name}`")]
    UnresolvedPredicate {
        schema: String,
        field: String,
        name: String,
    },

    /// A rule carries structurally invalid parameters.
    #[error("{schema}.{field}: invalid parameters for `{rule}`: {message}")]
    InvalidParameter {
        schema: String,
        field: String,
        rule: &'static str,
        message: String,
    },

    /// A checkpoint sits past the end of the rule chain.
    #[error("{schema}.{field}: checkpoint {position} is out of range (chain has {steps} steps)")]
    CheckpointOutOfRange {
        schema: String,
        field: String,
        position: usize,
        steps: usize,
    },

    /// Two fields of one schema share a name.
    #[error("{schema}: duplicate field `{field}`")]
    DuplicateField { schema: String, field: String },

    /// Two schemas in one set share a name.
    #[error("duplicate schema `{schema}`")]
    DuplicateSchema { schema: String },

    /// A nested spec refers to a schema that is not part of the set.
    #[error("{schema}.{field}: nested schema `{target}` is not defined")]
    UnknownNestedSchema {
        schema: String,
        field: String,
        target: String,
    },
}

impl SchemaError {
    /// Name of the schema the error was raised for.
    #[must_use]
    pub fn schema(&self) -> &str {
        match self {
            Self::UnsafePattern { schema, .. }
            | Self::InvalidPattern { schema, .. }
            | Self::UnresolvedPredicate { schema, .. }
            | Self::InvalidParameter { schema, .. }
            | Self::CheckpointOutOfRange { schema, .. }
            | Self::DuplicateField { schema, .. }
            | Self::DuplicateSchema { schema }
            | Self::UnknownNestedSchema { schema, .. } => schema,
        }
    }
}

// ============================================================================
// PREDICATE ERRORS
// ============================================================================

/// A custom predicate could not reach a verdict.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl PredicateError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// EXECUTION ERRORS
// ============================================================================

/// A validation call was aborted.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// No plan is compiled under this name.
    #[error("no compiled plan for schema `{0}`")]
    UnknownSchema(String),

    /// A custom predicate returned an error.
    #[error("custom predicate `{predicate}` failed at `{path}`")]
    Predicate {
        predicate: String,
        path: String,
        #[source]
        source: PredicateError,
    },

    /// Nested validation went deeper than the configured maximum.
    #[error("nesting at `{path}` exceeds the maximum depth of {max_depth}")]
    DepthExceeded { path: String, max_depth: usize },

    /// A typed value could not be turned into a JSON snapshot.
    #[error("failed to snapshot value for validation")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// VALIDATE ERRORS
// ============================================================================

/// Error of the throwing consumption style.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// At least one rule failed.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// The call itself was aborted.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl ValidateError {
    /// The error report, when the failure was a rule failure.
    #[must_use]
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Execution(_) => None,
        }
    }

    /// Returns true when the failure came from rules rather than execution.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<ValidationErrors> for ValidateError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}
