//! The algebraic result of one validation call.

use crate::foundation::ValidationErrors;

/// Either the validated value or the full error report.
///
/// Produced by [`Validator::validate`](crate::engine::Validator::validate).
/// Callers that prefer `?`-style control flow can use
/// [`into_result`](Self::into_result) or
/// [`Validator::validate_or_throw`](crate::engine::Validator::validate_or_throw).
///
/// # Examples
///
/// ```rust,ignore
/// let message = validator
///     .validate(payload, &ctx)
///     .await?
///     .map(|user| user.email)
///     .fold(|email| format!("welcome {email}"), |errors| errors.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an outcome may carry validation errors that must be handled"]
pub enum Outcome<T> {
    /// Every rule passed.
    Success(T),
    /// At least one rule failed.
    Failure(ValidationErrors),
}

impl<T> Outcome<T> {
    /// `Success(value)` when `errors` is empty, `Failure(errors)` otherwise.
    pub fn from_errors(value: T, errors: ValidationErrors) -> Self {
        if errors.is_empty() {
            Self::Success(value)
        } else {
            Self::Failure(errors)
        }
    }

    /// Returns true for `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for `Failure`.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The validated value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The error report, if any.
    #[must_use]
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Success(_) => None,
            Self::Failure(errors) => Some(errors),
        }
    }

    /// Transforms the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }

    /// Chains another outcome-producing step onto a success.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }

    /// Collapses both branches into one value.
    pub fn fold<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(ValidationErrors) -> R,
    ) -> R {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(errors) => on_failure(errors),
        }
    }

    /// The success value, or one computed from the errors.
    pub fn get_or_else(self, f: impl FnOnce(ValidationErrors) -> T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(errors) => f(errors),
        }
    }

    /// Runs `f` on the success value and passes the outcome through.
    pub fn on_success(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Runs `f` on the error report and passes the outcome through.
    pub fn on_failure(self, f: impl FnOnce(&ValidationErrors)) -> Self {
        if let Self::Failure(errors) = &self {
            f(errors);
        }
        self
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, ValidationErrors> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(errors) => Err(errors),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, ValidationErrors> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}
