//! Core types shared by every layer of the engine.
//!
//! - **Context**: [`ValidationContext`], [`Locale`], [`Clock`]
//! - **Errors**: [`SchemaError`], [`ExecutionError`], [`ValidateError`],
//!   [`PredicateError`]
//! - **Results**: [`ValidationErrors`], [`Outcome`], [`FieldPath`]
//!
//! # Examples
//!
//! ```rust,ignore
//! use warden_validator::foundation::{Outcome, ValidationErrors};
//!
//! let mut errors = ValidationErrors::new();
//! errors.push("email", "invalid email format");
//! let outcome: Outcome<()> = Outcome::from_errors((), errors);
//! assert!(outcome.is_failure());
//! ```

pub mod context;
pub mod error;
pub mod errors;
pub mod outcome;
pub mod path;

pub use context::{
    Clock, FixedClock, Locale, SystemClock, ValidationContext, ValidationContextBuilder,
};
pub use error::{ExecutionError, PredicateError, SchemaError, ValidateError};
pub use errors::ValidationErrors;
pub use outcome::Outcome;
pub use path::FieldPath;
