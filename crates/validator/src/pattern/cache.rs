//! Process-wide memoization of admitted patterns.

use std::sync::LazyLock;

use dashmap::DashMap;

use crate::pattern::{AdmittedPattern, PatternAnalyzer, PatternRejection};

static GLOBAL: LazyLock<PatternCache> = LazyLock::new(PatternCache::new);

/// Concurrent read-through cache from pattern text to compiled regex.
///
/// Entries are only ever inserted for patterns the analyzer admitted.
/// Rejections are not cached, so a pattern rejected under one
/// configuration is re-checked under the next.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: DashMap<String, AdmittedPattern>,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// The cache shared by every compiler in the process.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the cached entry or runs the analyzer and stores the result.
    ///
    /// The length ceiling of `analyzer` is applied before the lookup.
    pub fn get_or_admit(
        &self,
        pattern: &str,
        analyzer: &PatternAnalyzer,
    ) -> Result<AdmittedPattern, PatternRejection> {
        analyzer.check_length(pattern)?;
        if let Some(hit) = self.entries.get(pattern) {
            return Ok(hit.value().clone());
        }
        let admitted = analyzer.admit(pattern)?;
        Ok(self
            .entries
            .entry(pattern.to_owned())
            .or_insert(admitted)
            .value()
            .clone())
    }

    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.contains_key(pattern)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
