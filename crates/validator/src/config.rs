//! Engine configuration.
//!
//! [`EngineConfig`] deserializes from JSON with every key optional:
//!
//! ```json
//! {
//!   "max_concurrency": 8,
//!   "nested_policy": "skip_on_local_failure",
//!   "max_depth": 32,
//!   "analyzer": { "max_pattern_len": 2048 }
//! }
//! ```

use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::engine::Dispatcher;
use crate::pattern::AnalyzerConfig;

/// Default ceiling on nested validation depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Whether nested validation runs for a field whose own chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedPolicy {
    /// Nested validation always runs for non-null values.
    #[default]
    Always,
    /// Nested validation is skipped once the field itself produced a message.
    SkipOnLocalFailure,
}

impl NestedPolicy {
    /// Whether nested validation may run given the field's local result.
    #[must_use]
    pub fn allows(self, local_failed: bool) -> bool {
        match self {
            Self::Always => true,
            Self::SkipOnLocalFailure => !local_failed,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The document is not valid JSON for this shape.
    #[error("failed to parse engine config")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid engine config: {0}")]
    Invalid(String),
}

/// Tunables of the compiler and executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Permits of the default dispatcher.
    pub max_concurrency: usize,
    /// Nested validation after local failures.
    pub nested_policy: NestedPolicy,
    /// Maximum nesting depth before the call is aborted.
    pub max_depth: usize,
    /// Pattern analyzer limits.
    pub analyzer: AnalyzerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_parallelism(),
            nested_policy: NestedPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and checks a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.analyzer.max_pattern_len == 0 {
            return Err(ConfigError::Invalid(
                "analyzer.max_pattern_len must be at least 1".into(),
            ));
        }
        Ok(())
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_concurrency(mut self, permits: usize) -> Self {
        self.max_concurrency = permits;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested_policy(mut self, policy: NestedPolicy) -> Self {
        self.nested_policy = policy;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// A dispatcher sized to `max_concurrency`.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::bounded(self.max_concurrency)
    }
}

pub(crate) fn default_parallelism() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.nested_policy, NestedPolicy::Always);
    }

    #[test]
    fn partial_document_overrides_keys() {
        let config = EngineConfig::from_json_str(
            r#"{"max_concurrency": 3, "nested_policy": "skip_on_local_failure",
                "analyzer": {"max_pattern_len": 128}}"#,
        )
        .unwrap();
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.nested_policy, NestedPolicy::SkipOnLocalFailure);
        assert_eq!(config.analyzer.max_pattern_len, 128);
        assert_eq!(config.dispatcher().capacity(), Some(3));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{"max_concurrency": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = EngineConfig::from_json_str(r#"{"nested_policy": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn policy_gates_nested_validation() {
        assert!(NestedPolicy::Always.allows(true));
        assert!(NestedPolicy::SkipOnLocalFailure.allows(false));
        assert!(!NestedPolicy::SkipOnLocalFailure.allows(true));
    }
}
