//! The message resolver contract.

use async_trait::async_trait;

use crate::foundation::Locale;

/// Turns a message key and its arguments into text for a locale.
///
/// Resolution never fails: an implementation that cannot find a message
/// returns the key itself. The method is async so that implementations may
/// consult remote catalogs; the bundled one answers from memory.
#[async_trait]
pub trait MessageResolver: Send + Sync {
    async fn resolve(&self, key: &str, args: &[String], locale: &Locale) -> String;
}
