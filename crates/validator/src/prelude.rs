//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use warden_validator::prelude::*;
//!
//! let schema = Schema::builder("Order")
//!     .field("items", |f| f.rule(RuleKind::NotEmpty).each("Item"))
//!     .build();
//! ```

// ============================================================================
// SCHEMA: Declarative model
// ============================================================================

pub use crate::schema::{FieldRule, IpFamily, NestedSpec, RuleKind, RuleStep, Schema};

// ============================================================================
// ENGINE: Compilation and execution
// ============================================================================

pub use crate::config::{EngineConfig, NestedPolicy};
pub use crate::engine::{Dispatcher, HasSchema, Validator};
pub use crate::plan::{Compiler, Plan, PlanSet};

// ============================================================================
// FOUNDATION: Context, results, errors
// ============================================================================

pub use crate::foundation::{
    Clock, ExecutionError, FieldPath, FixedClock, Locale, Outcome, PredicateError, SchemaError,
    SystemClock, ValidateError, ValidationContext, ValidationErrors,
};

// ============================================================================
// EXTENSION POINTS: Custom predicates and messages
// ============================================================================

pub use crate::messages::{BundledResolver, MessageResolver};
pub use crate::predicates::{CustomPredicate, PredicateRegistry, Verdict};
