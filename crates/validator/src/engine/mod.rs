//! The validation executor.
//!
//! [`Validator`] owns a compiled [`PlanSet`](crate::plan::PlanSet) and runs
//! it against values; [`Dispatcher`] bounds how many field chains evaluate at
//! once.

mod dispatch;
mod executor;

pub use dispatch::Dispatcher;
pub use executor::{HasSchema, Validator, ValidatorBuilder};
