//! # warden-validator
//!
//! Schema-driven validation of structured payloads.
//!
//! Schemas declare ordered rule chains per field. The [`Compiler`] turns a
//! schema set into executable plans once, rejecting backtracking-prone
//! patterns and unresolved custom predicates up front. A [`Validator`] then
//! runs the plans concurrently, one future per field, and reports every
//! failure under its field path with a localized message.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use warden_validator::prelude::*;
//!
//! let schema = Schema::builder("SignUp")
//!     .field("email", |f| f.rule(RuleKind::Required).rule(RuleKind::Email))
//!     .field("age", |f| f.rule(RuleKind::Required).rule(RuleKind::Min(18.0)))
//!     .build();
//!
//! let validator = Validator::builder().schema(schema).build()?;
//! let ctx = validator.default_context();
//!
//! let outcome = validator
//!     .validate_json("SignUp", json!({"email": "bad", "age": 15}), &ctx)
//!     .await?;
//! // {"email": ["invalid email format"], "age": ["must be at least 18"]}
//! println!("{}", serde_json::to_string(outcome.errors().unwrap())?);
//! ```
//!
//! ## Layers
//!
//! - [`schema`]: the declarative model, built fluently or loaded from JSON
//! - [`pattern`]: the ReDoS analyzer and the compiled-pattern cache
//! - [`predicates`]: built-in checks and the custom predicate registry
//! - [`plan`]: compilation of schemas into plans
//! - [`engine`]: concurrent execution
//! - [`messages`]: localized message lookup
//! - [`foundation`]: context, paths, errors and [`Outcome`]

pub mod config;
pub mod engine;
pub mod foundation;
pub mod messages;
pub mod pattern;
pub mod plan;
pub mod predicates;
pub mod prelude;
pub mod schema;

pub use config::{EngineConfig, NestedPolicy};
pub use engine::{Dispatcher, HasSchema, Validator, ValidatorBuilder};
pub use foundation::{
    ExecutionError, FieldPath, Outcome, SchemaError, ValidateError, ValidationContext,
    ValidationErrors,
};
pub use plan::{Compiler, Plan, PlanSet};
pub use schema::{FieldRule, RuleKind, RuleStep, Schema};
