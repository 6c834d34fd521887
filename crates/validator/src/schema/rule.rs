//! Rule kinds and rule steps.
//!
//! A [`RuleKind`] is a tagged variant carrying its own parameters. In JSON it
//! is written as `{"rule": "min", "value": 18}`; parameterless rules omit
//! `value` (`{"rule": "required"}`).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default nesting limit of [`RuleKind::JsonString`].
pub const DEFAULT_JSON_DEPTH: usize = 128;

/// Address family accepted by [`RuleKind::IpAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpFamily {
    V4,
    V6,
    #[default]
    Any,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V4 => "IPv4",
            Self::V6 => "IPv6",
            Self::Any => "IP",
        })
    }
}

fn default_json_depth() -> usize {
    DEFAULT_JSON_DEPTH
}

/// Every predicate a rule step can invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RuleKind {
    // ── presence ────────────────────────────────────────────────────────
    Required,
    RequiredIf { field: String, equals: Value },
    RequiredUnless { field: String, equals: Value },
    RequiredWith { field: String },
    RequiredWithout { field: String },

    // ── string ──────────────────────────────────────────────────────────
    NotBlank,
    MinLength(usize),
    MaxLength(usize),
    Length { min: usize, max: usize },
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    Lowercase,
    Uppercase,
    OneOf(Vec<Value>),
    Pattern(String),
    Email,
    Url,
    Uuid,

    // ── numeric ─────────────────────────────────────────────────────────
    Min(f64),
    Max(f64),
    Range { min: f64, max: f64 },
    Positive,
    Negative,
    Even,
    Odd,
    DivisibleBy(i64),
    DecimalPlaces(u32),

    // ── collection ──────────────────────────────────────────────────────
    MinSize(usize),
    MaxSize(usize),
    NotEmpty,
    UniqueItems,

    // ── network ─────────────────────────────────────────────────────────
    IpAddress(IpFamily),

    // ── json shape ──────────────────────────────────────────────────────
    JsonString {
        #[serde(default = "default_json_depth")]
        max_depth: usize,
    },

    // ── time ────────────────────────────────────────────────────────────
    Past,
    Future,
    PastOrPresent,
    FutureOrPresent,

    // ── cross-field ─────────────────────────────────────────────────────
    EqualsField(String),
    NotEqualsField(String),

    // ── custom ──────────────────────────────────────────────────────────
    Custom(String),
}

impl RuleKind {
    /// The rule's tag, also its default message key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::RequiredIf { .. } => "required_if",
            Self::RequiredUnless { .. } => "required_unless",
            Self::RequiredWith { .. } => "required_with",
            Self::RequiredWithout { .. } => "required_without",
            Self::NotBlank => "not_blank",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Length { .. } => "length",
            Self::StartsWith(_) => "starts_with",
            Self::EndsWith(_) => "ends_with",
            Self::Contains(_) => "contains",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::OneOf(_) => "one_of",
            Self::Pattern(_) => "pattern",
            Self::Email => "email",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Range { .. } => "range",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Even => "even",
            Self::Odd => "odd",
            Self::DivisibleBy(_) => "divisible_by",
            Self::DecimalPlaces(_) => "decimal_places",
            Self::MinSize(_) => "min_size",
            Self::MaxSize(_) => "max_size",
            Self::NotEmpty => "not_empty",
            Self::UniqueItems => "unique_items",
            Self::IpAddress(_) => "ip_address",
            Self::JsonString { .. } => "json_string",
            Self::Past => "past",
            Self::Future => "future",
            Self::PastOrPresent => "past_or_present",
            Self::FutureOrPresent => "future_or_present",
            Self::EqualsField(_) => "equals_field",
            Self::NotEqualsField(_) => "not_equals_field",
            Self::Custom(_) => "custom",
        }
    }

    /// Presence rules also run when the value is null or absent.
    #[must_use]
    pub fn is_presence(&self) -> bool {
        matches!(
            self,
            Self::Required
                | Self::RequiredIf { .. }
                | Self::RequiredUnless { .. }
                | Self::RequiredWith { .. }
                | Self::RequiredWithout { .. }
        )
    }

    /// Positional arguments interpolated into the rule's message.
    #[must_use]
    pub fn message_args(&self) -> Vec<String> {
        match self {
            Self::RequiredIf { field, equals } | Self::RequiredUnless { field, equals } => {
                vec![field.clone(), display_value(equals)]
            }
            Self::RequiredWith { field }
            | Self::RequiredWithout { field }
            | Self::EqualsField(field)
            | Self::NotEqualsField(field) => vec![field.clone()],
            Self::MinLength(n) | Self::MaxLength(n) | Self::MinSize(n) | Self::MaxSize(n) => {
                vec![n.to_string()]
            }
            Self::Length { min, max } => vec![min.to_string(), max.to_string()],
            Self::StartsWith(s) | Self::EndsWith(s) | Self::Contains(s) | Self::Pattern(s) => {
                vec![s.clone()]
            }
            Self::OneOf(values) => vec![
                values
                    .iter()
                    .map(display_value)
                    .collect::<Vec<_>>()
                    .join(", "),
            ],
            Self::Min(n) | Self::Max(n) => vec![format_number(*n)],
            Self::Range { min, max } => vec![format_number(*min), format_number(*max)],
            Self::DivisibleBy(n) => vec![n.to_string()],
            Self::DecimalPlaces(n) => vec![n.to_string()],
            Self::IpAddress(family) => vec![family.to_string()],
            Self::JsonString { max_depth } => vec![max_depth.to_string()],
            Self::Custom(name) => vec![name.clone()],
            Self::Required
            | Self::NotBlank
            | Self::Lowercase
            | Self::Uppercase
            | Self::Email
            | Self::Url
            | Self::Uuid
            | Self::Positive
            | Self::Negative
            | Self::Even
            | Self::Odd
            | Self::NotEmpty
            | Self::UniqueItems
            | Self::Past
            | Self::Future
            | Self::PastOrPresent
            | Self::FutureOrPresent => Vec::new(),
        }
    }

    /// [`RuleKind::JsonString`] with the default depth limit.
    #[must_use]
    pub fn json_string() -> Self {
        Self::JsonString {
            max_depth: DEFAULT_JSON_DEPTH,
        }
    }

    /// [`RuleKind::Pattern`] from any string-like pattern.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    /// [`RuleKind::Custom`] referring to a registered predicate.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }
}

/// Renders numbers without a trailing `.0` when they are whole.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Strings render bare, everything else as JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One position in a field's rule chain.
///
/// `message` overrides the message key; unknown keys fall back to the key
/// text itself, so a literal sentence works as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleStep {
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleStep {
    #[must_use]
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, key: impl Into<String>) -> Self {
        self.message = Some(key.into());
        self
    }

    /// The key handed to the message resolver.
    #[must_use]
    pub fn message_key(&self) -> &str {
        self.message.as_deref().unwrap_or_else(|| self.kind.name())
    }
}

impl From<RuleKind> for RuleStep {
    fn from(kind: RuleKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(RuleKind::Min(18.0), json!({"rule": "min", "value": 18.0}))]
    #[case(RuleKind::Required, json!({"rule": "required"}))]
    #[case(
        RuleKind::Length { min: 2, max: 5 },
        json!({"rule": "length", "value": {"min": 2, "max": 5}})
    )]
    #[case(RuleKind::IpAddress(IpFamily::V4), json!({"rule": "ip_address", "value": "v4"}))]
    fn kinds_use_tagged_form(#[case] kind: RuleKind, #[case] expected: Value) {
        assert_eq!(serde_json::to_value(&kind).unwrap(), expected);
    }

    #[test]
    fn step_reads_flat_document() {
        let step: RuleStep =
            serde_json::from_value(json!({"rule": "min", "value": 18, "message": "too_young"}))
                .unwrap();
        assert_eq!(step.kind, RuleKind::Min(18.0));
        assert_eq!(step.message_key(), "too_young");
    }

    #[test]
    fn json_string_depth_defaults() {
        let kind: RuleKind =
            serde_json::from_value(json!({"rule": "json_string", "value": {}})).unwrap();
        assert_eq!(kind, RuleKind::json_string());
    }

    #[test]
    fn presence_rules_are_flagged() {
        assert!(RuleKind::Required.is_presence());
        assert!(
            RuleKind::RequiredWith {
                field: "a".into()
            }
            .is_presence()
        );
        assert!(!RuleKind::Email.is_presence());
    }

    #[rstest]
    #[case(RuleKind::Min(18.0), vec!["18"])]
    #[case(RuleKind::Range { min: 0.5, max: 10.0 }, vec!["0.5", "10"])]
    #[case(RuleKind::OneOf(vec![json!("a"), json!(1)]), vec!["a, 1"])]
    #[case(RuleKind::IpAddress(IpFamily::V6), vec!["IPv6"])]
    #[case(RuleKind::Email, vec![])]
    fn message_args_render_parameters(#[case] kind: RuleKind, #[case] expected: Vec<&str>) {
        assert_eq!(kind.message_args(), expected);
    }
}
