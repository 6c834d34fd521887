//! Plan compilation.
//!
//! A [`Plan`] is a schema with every pattern admitted by the safety analyzer
//! and every custom reference resolved, ready for the executor.

mod compiled;
mod compiler;

pub use compiled::{CompiledField, CompiledStep, PatternWarning, Plan, PlanSet};
pub use compiler::{Compiler, MAX_JSON_DEPTH};
