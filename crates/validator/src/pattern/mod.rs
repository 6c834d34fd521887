//! Pattern safety: the ReDoS analyzer and the compiled-pattern cache.

mod analyzer;
mod cache;
mod syntax;

pub use analyzer::{
    AdmittedPattern, AnalyzerConfig, DEFAULT_MAX_PATTERN_LEN, PatternAnalyzer, PatternRejection,
    PatternVerdict, RejectReason, analyze,
};
pub use cache::PatternCache;
