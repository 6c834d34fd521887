//! Localized message resolution.
//!
//! Failed rules produce a message key (the rule name or the step's own key)
//! and positional arguments. A [`MessageResolver`] turns them into text for
//! the context's locale; [`BundledResolver`] is the default.

mod bundled;
mod resolver;
mod tables;
mod template;

pub use bundled::BundledResolver;
pub use resolver::MessageResolver;
pub use template::{interpolate, render};
