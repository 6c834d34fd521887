//! Per-call validation context.
//!
//! A [`ValidationContext`] carries everything a validation call needs besides
//! the plan and the value: the locale for messages, the resolver that renders
//! them, the dispatcher that bounds concurrency, the clock used by time rules
//! and free-form metadata for custom predicates.
//!
//! Contexts are immutable. Every shared part lives behind an `Arc`, so
//! cloning is cheap and the `with_*` derivations copy rather than mutate.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::engine::Dispatcher;
use crate::messages::{BundledResolver, MessageResolver};

// ============================================================================
// LOCALE
// ============================================================================

/// A normalized locale tag such as `en`, `es` or `en-us`.
///
/// Tags are lower-cased and `_` separators become `-`, so `en_US` and
/// `EN-us` name the same locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(Arc<str>);

impl Locale {
    /// Normalizes and wraps a locale tag.
    pub fn new(tag: &str) -> Self {
        let normalized: String = tag
            .trim()
            .chars()
            .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        Self(Arc::from(normalized))
    }

    /// The normalized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(Arc::from("en"))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

// ============================================================================
// CLOCK
// ============================================================================

/// Source of "now" for time-relative rules.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Freezes the clock at `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

static DEFAULT_RESOLVER: LazyLock<Arc<BundledResolver>> =
    LazyLock::new(|| Arc::new(BundledResolver::new()));

/// Immutable settings for one or many validation calls.
///
/// # Examples
///
/// ```rust,ignore
/// let ctx = ValidationContext::new().with_locale("es");
/// let german = ctx.with_locale("de_DE");
/// assert_eq!(ctx.locale().as_str(), "es");
/// assert_eq!(german.locale().as_str(), "de-de");
/// ```
#[derive(Clone)]
pub struct ValidationContext {
    locale: Locale,
    resolver: Arc<dyn MessageResolver>,
    dispatcher: Dispatcher,
    clock: Arc<dyn Clock>,
    metadata: Arc<HashMap<String, Value>>,
}

impl ValidationContext {
    /// A context with the English locale, bundled messages, CPU-sized
    /// dispatcher and system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locale: Locale::default(),
            resolver: DEFAULT_RESOLVER.clone(),
            dispatcher: Dispatcher::cpu(),
            clock: Arc::new(SystemClock),
            metadata: Arc::new(HashMap::new()),
        }
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::default()
    }

    /// Copy with another locale.
    #[must_use]
    pub fn with_locale(&self, locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            ..self.clone()
        }
    }

    /// Copy with another message resolver.
    #[must_use]
    pub fn with_resolver(&self, resolver: Arc<dyn MessageResolver>) -> Self {
        Self {
            resolver,
            ..self.clone()
        }
    }

    /// Copy with another dispatcher.
    #[must_use]
    pub fn with_dispatcher(&self, dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            ..self.clone()
        }
    }

    /// Copy with another clock.
    #[must_use]
    pub fn with_clock(&self, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ..self.clone()
        }
    }

    /// Copy with one metadata entry added or replaced.
    #[must_use]
    pub fn with_metadata(&self, key: impl Into<String>, value: Value) -> Self {
        let mut metadata = (*self.metadata).clone();
        metadata.insert(key.into(), value);
        Self {
            metadata: Arc::new(metadata),
            ..self.clone()
        }
    }

    /// The message locale.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// The message resolver.
    #[must_use]
    pub fn resolver(&self) -> &Arc<dyn MessageResolver> {
        &self.resolver
    }

    /// The concurrency limiter.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The clock used by time rules.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Looks up one metadata entry.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Renders a message through the resolver in this context's locale.
    pub async fn message(&self, key: &str, args: &[String]) -> String {
        self.resolver.resolve(key, args, &self.locale).await
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("locale", &self.locale)
            .field("dispatcher", &self.dispatcher)
            .field("clock", &self.clock)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ValidationContext`]; unset parts take the defaults of
/// [`ValidationContext::new`].
#[derive(Default)]
pub struct ValidationContextBuilder {
    locale: Option<Locale>,
    resolver: Option<Arc<dyn MessageResolver>>,
    dispatcher: Option<Dispatcher>,
    clock: Option<Arc<dyn Clock>>,
    metadata: HashMap<String, Value>,
}

impl ValidationContextBuilder {
    #[must_use = "builder methods must be chained or built"]
    pub fn locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn resolver(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Finishes the context.
    #[must_use]
    pub fn build(self) -> ValidationContext {
        let base = ValidationContext::new();
        ValidationContext {
            locale: self.locale.unwrap_or(base.locale),
            resolver: self.resolver.unwrap_or(base.resolver),
            dispatcher: self.dispatcher.unwrap_or(base.dispatcher),
            clock: self.clock.unwrap_or(base.clock),
            metadata: Arc::new(self.metadata),
        }
    }
}
