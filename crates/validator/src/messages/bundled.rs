//! The default, in-memory message resolver.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::foundation::Locale;
use crate::messages::tables::LOCALES;
use crate::messages::template::render;
use crate::messages::MessageResolver;

type Table = HashMap<String, String>;

/// Resolves messages from tables loaded at construction.
///
/// Built-in tables cover `en`, `es` and `de`. Lookup order for a locale is
/// its overrides, then its built-in table, then the key itself; locales do
/// not fall back to one another.
///
/// # Examples
///
/// ```rust,ignore
/// let resolver = BundledResolver::new()
///     .with_override("en", "email", "please enter a valid email")
///     .with_override("fr", "required", "est obligatoire");
/// ```
#[derive(Debug, Clone)]
pub struct BundledResolver {
    builtin: HashMap<Locale, Table>,
    overrides: HashMap<Locale, Table>,
}

impl BundledResolver {
    /// Loads every built-in locale.
    #[must_use]
    pub fn new() -> Self {
        let builtin = LOCALES
            .iter()
            .map(|(tag, entries)| {
                let table = entries
                    .iter()
                    .map(|(key, template)| ((*key).to_owned(), (*template).to_owned()))
                    .collect();
                (Locale::new(tag), table)
            })
            .collect();
        Self {
            builtin,
            overrides: HashMap::new(),
        }
    }

    /// Adds or replaces one template for a locale, built-in or not.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_override(
        mut self,
        locale: impl Into<Locale>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.overrides
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// Locales with a built-in table.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.builtin.keys()
    }

    /// The template chosen for `key`, before interpolation.
    #[must_use]
    pub fn template<'a>(&'a self, key: &'a str, locale: &Locale) -> &'a str {
        self.overrides
            .get(locale)
            .and_then(|table| table.get(key))
            .or_else(|| self.builtin.get(locale).and_then(|table| table.get(key)))
            .map_or(key, String::as_str)
    }

    /// Synchronous resolution, the body of the async trait method.
    #[must_use]
    pub fn resolve_now(&self, key: &str, args: &[String], locale: &Locale) -> String {
        render(self.template(key, locale), args)
    }
}

impl Default for BundledResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageResolver for BundledResolver {
    async fn resolve(&self, key: &str, args: &[String], locale: &Locale) -> String {
        self.resolve_now(key, args, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(s: &str) -> Vec<String> {
        vec![s.to_owned()]
    }

    #[test]
    fn loads_all_locales() {
        let resolver = BundledResolver::new();
        let mut tags: Vec<_> = resolver.locales().map(Locale::as_str).collect();
        tags.sort_unstable();
        assert_eq!(tags, vec!["de", "en", "es"]);
    }

    #[test]
    fn override_wins_over_builtin() {
        let resolver = BundledResolver::new().with_override("en", "min", "too small, need {0}");
        assert_eq!(
            resolver.resolve_now("min", &arg("18"), &Locale::new("en")),
            "too small, need 18"
        );
        assert_eq!(
            resolver.resolve_now("min", &arg("18"), &Locale::new("de")),
            "muss mindestens 18 sein"
        );
    }

    #[test]
    fn unknown_key_or_locale_yields_key() {
        let resolver = BundledResolver::new();
        assert_eq!(
            resolver.resolve_now("no_such_key", &[], &Locale::new("en")),
            "no_such_key"
        );
        assert_eq!(
            resolver.resolve_now("required", &[], &Locale::new("fr")),
            "required"
        );
    }

    #[test]
    fn overrides_can_add_locales() {
        let resolver = BundledResolver::new().with_override("fr", "required", "est obligatoire");
        assert_eq!(
            resolver.resolve_now("required", &[], &Locale::new("fr_FR")),
            "required"
        );
        assert_eq!(
            resolver.resolve_now("required", &[], &Locale::new("FR")),
            "est obligatoire"
        );
    }

    #[tokio::test]
    async fn malformed_override_renders_raw() {
        let resolver = BundledResolver::new().with_override("en", "min", "at least {0");
        let text = resolver
            .resolve("min", &arg("3"), &Locale::new("en"))
            .await;
        assert_eq!(text, "at least {0");
    }
}
