//! Field rules and their builder.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::{RuleKind, RuleStep};

/// Marks a field whose value is validated against another schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedSpec {
    /// Name of the schema applied to the nested value.
    pub schema: String,
    /// The field is a collection and every element is validated.
    #[serde(default)]
    pub each_element: bool,
}

fn default_nullable() -> bool {
    true
}

/// The rules declared for one field.
///
/// A checkpoint `p` sits after the first `p` steps: once the chain reaches
/// it, validation of this field stops if any earlier step failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    name: String,
    #[serde(default = "default_nullable")]
    nullable: bool,
    #[serde(default)]
    steps: Vec<RuleStep>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    checkpoints: BTreeSet<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nested: Option<NestedSpec>,
}

impl FieldRule {
    /// Starts a builder for the field `name`.
    pub fn builder(name: impl Into<String>) -> FieldRuleBuilder {
        FieldRuleBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// False when a null value is itself a failure.
    #[must_use]
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn steps(&self) -> &[RuleStep] {
        &self.steps
    }

    #[must_use]
    pub fn checkpoints(&self) -> &BTreeSet<usize> {
        &self.checkpoints
    }

    #[must_use]
    pub fn nested(&self) -> Option<&NestedSpec> {
        self.nested.as_ref()
    }
}

/// Fluent construction of a [`FieldRule`].
///
/// # Examples
///
/// ```rust,ignore
/// let email = FieldRule::builder("email")
///     .rule(RuleKind::Required)
///     .checkpoint()
///     .rule(RuleKind::Email)
///     .build();
/// assert!(email.checkpoints().contains(&1));
/// ```
#[derive(Debug, Clone)]
pub struct FieldRuleBuilder {
    rule: FieldRule,
}

impl FieldRuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            rule: FieldRule {
                name: name.into(),
                nullable: true,
                steps: Vec::new(),
                checkpoints: BTreeSet::new(),
                nested: None,
            },
        }
    }

    /// Appends a rule using its default message.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, kind: RuleKind) -> Self {
        self.rule.steps.push(RuleStep::new(kind));
        self
    }

    /// Appends a rule with its own message key.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule_with_message(mut self, kind: RuleKind, key: impl Into<String>) -> Self {
        self.rule.steps.push(RuleStep::new(kind).with_message(key));
        self
    }

    /// Appends a prepared step.
    #[must_use = "builder methods must be chained or built"]
    pub fn step(mut self, step: RuleStep) -> Self {
        self.rule.steps.push(step);
        self
    }

    /// Places a checkpoint after the rules added so far.
    #[must_use = "builder methods must be chained or built"]
    pub fn checkpoint(mut self) -> Self {
        self.rule.checkpoints.insert(self.rule.steps.len());
        self
    }

    /// Places a checkpoint at an explicit position; the compiler checks the
    /// range.
    #[must_use = "builder methods must be chained or built"]
    pub fn checkpoint_at(mut self, position: usize) -> Self {
        self.rule.checkpoints.insert(position);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.rule.nullable = nullable;
        self
    }

    /// Shorthand for `nullable(false)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn non_null(self) -> Self {
        self.nullable(false)
    }

    /// Validates the field's object against `schema`.
    #[must_use = "builder methods must be chained or built"]
    pub fn nested(mut self, schema: impl Into<String>) -> Self {
        self.rule.nested = Some(NestedSpec {
            schema: schema.into(),
            each_element: false,
        });
        self
    }

    /// Validates every element of the field's array against `schema`.
    #[must_use = "builder methods must be chained or built"]
    pub fn each(mut self, schema: impl Into<String>) -> Self {
        self.rule.nested = Some(NestedSpec {
            schema: schema.into(),
            each_element: true,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> FieldRule {
        self.rule
    }
}
