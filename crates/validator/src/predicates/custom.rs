//! Caller-supplied predicates and their registry.
//!
//! A custom rule names a predicate (`RuleKind::Custom("unique_email")`);
//! the compiler resolves the name against a [`PredicateRegistry`] once, so a
//! missing name is a schema error rather than a per-call failure.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::foundation::{PredicateError, ValidationContext};

/// Outcome of a custom check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Invalid, optionally with a ready-made message that replaces the
    /// rule's default one.
    Invalid(Option<String>),
}

impl Verdict {
    /// Invalid with a specific message.
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::Invalid(Some(detail.into()))
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid(None) }
    }
}

/// Caller logic plugged into a rule chain.
///
/// Returning `Err` aborts the whole validation call with
/// [`ExecutionError::Predicate`](crate::foundation::ExecutionError::Predicate);
/// a predicate that prefers to fail open must map its own errors to a
/// [`Verdict`].
///
/// # Examples
///
/// ```rust,ignore
/// struct UniqueEmail { users: Arc<UserStore> }
///
/// #[async_trait]
/// impl CustomPredicate for UniqueEmail {
///     async fn check(&self, value: &Value, _: &Value, _: &ValidationContext)
///         -> Result<Verdict, PredicateError>
///     {
///         let email = value.as_str().unwrap_or_default();
///         let taken = self.users.exists(email).await
///             .map_err(|e| PredicateError::with_source("user lookup failed", e))?;
///         Ok(if taken { Verdict::invalid("is already registered") } else { Verdict::Valid })
///     }
/// }
/// ```
#[async_trait]
pub trait CustomPredicate: Send + Sync {
    /// Checks `value`; `parent` is the object holding the field.
    async fn check(
        &self,
        value: &Value,
        parent: &Value,
        ctx: &ValidationContext,
    ) -> Result<Verdict, PredicateError>;
}

/// Adapts a synchronous closure into a [`CustomPredicate`].
pub struct FnPredicate<F>(F);

impl<F> FnPredicate<F>
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self(check)
    }
}

#[async_trait]
impl<F> CustomPredicate for FnPredicate<F>
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    async fn check(
        &self,
        value: &Value,
        parent: &Value,
        _ctx: &ValidationContext,
    ) -> Result<Verdict, PredicateError> {
        Ok((self.0)(value, parent).into())
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").finish_non_exhaustive()
    }
}

/// Named custom predicates available to the compiler.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Arc<dyn CustomPredicate>>,
}

impl PredicateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `predicate` under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl CustomPredicate + 'static,
    ) -> &mut Self {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Registers a synchronous `(value, parent) -> valid` closure.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.register(name, FnPredicate::new(check))
    }

    /// Builder-style [`register`](Self::register).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, name: impl Into<String>, predicate: impl CustomPredicate + 'static) -> Self {
        self.register(name, predicate);
        self
    }

    /// Builder-style [`register_fn`](Self::register_fn).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_fn<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.register_fn(name, check);
        self
    }

    /// The predicate registered under `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn CustomPredicate>> {
        self.predicates.get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PredicateRegistry")
            .field("predicates", &names)
            .finish()
    }
}
