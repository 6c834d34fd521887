//! Executable plans.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::foundation::{PredicateError, ValidationContext};
use crate::predicates::{self, CustomPredicate, Verdict};
use crate::schema::{NestedSpec, RuleKind};

/// How a compiled step reaches its verdict.
#[derive(Clone)]
pub(crate) enum Matcher {
    Builtin,
    Pattern(Regex),
    Custom(Arc<dyn CustomPredicate>),
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("Builtin"),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// One rule step with its pattern compiled or predicate resolved.
#[derive(Debug, Clone)]
pub struct CompiledStep {
    kind: RuleKind,
    matcher: Matcher,
    message_key: String,
    explicit_message: bool,
    args: Vec<String>,
}

impl CompiledStep {
    pub(crate) fn new(kind: RuleKind, matcher: Matcher, message: Option<&str>) -> Self {
        let args = kind.message_args();
        Self {
            message_key: message.unwrap_or_else(|| kind.name()).to_owned(),
            explicit_message: message.is_some(),
            kind,
            matcher,
            args,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// Interpolation arguments of the step's message.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The custom predicate's name, or the rule name for built-ins.
    #[must_use]
    pub fn predicate_name(&self) -> &str {
        match &self.kind {
            RuleKind::Custom(name) => name.as_str(),
            kind => kind.name(),
        }
    }

    pub(crate) async fn check(
        &self,
        value: &Value,
        parent: &Value,
        ctx: &ValidationContext,
    ) -> Result<Verdict, PredicateError> {
        match &self.matcher {
            Matcher::Builtin => {
                Ok(predicates::evaluate(&self.kind, value, parent, ctx.clock()).into())
            }
            Matcher::Pattern(regex) => Ok(value.as_str().is_some_and(|s| regex.is_match(s)).into()),
            Matcher::Custom(predicate) => predicate.check(value, parent, ctx).await,
        }
    }

    /// Message for a failure; a step's own key beats a predicate's detail.
    pub(crate) async fn message(&self, detail: Option<String>, ctx: &ValidationContext) -> String {
        match detail {
            Some(detail) if !self.explicit_message => detail,
            _ => ctx.message(&self.message_key, &self.args).await,
        }
    }
}

/// A field with its steps compiled and checkpoints normalized.
#[derive(Debug, Clone)]
pub struct CompiledField {
    name: String,
    nullable: bool,
    steps: Vec<CompiledStep>,
    /// Sorted step-count thresholds.
    checkpoints: Vec<usize>,
    nested: Option<NestedSpec>,
}

impl CompiledField {
    pub(crate) fn new(
        name: String,
        nullable: bool,
        steps: Vec<CompiledStep>,
        checkpoints: Vec<usize>,
        nested: Option<NestedSpec>,
    ) -> Self {
        Self {
            name,
            nullable,
            steps,
            checkpoints,
            nested,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn steps(&self) -> &[CompiledStep] {
        &self.steps
    }

    #[must_use]
    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    #[must_use]
    pub fn nested(&self) -> Option<&NestedSpec> {
        self.nested.as_ref()
    }

    /// A checkpoint sits after the first `position` steps.
    #[must_use]
    pub fn stops_at(&self, position: usize) -> bool {
        self.checkpoints.binary_search(&position).is_ok()
    }
}

/// An analyzer warning attached to a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternWarning {
    pub field: String,
    pub pattern: String,
    pub message: String,
}

/// The executable form of one schema.
#[derive(Debug, Clone)]
pub struct Plan {
    name: String,
    fields: Vec<CompiledField>,
    warnings: Vec<PatternWarning>,
}

impl Plan {
    pub(crate) fn new(name: String, fields: Vec<CompiledField>, warnings: Vec<PatternWarning>) -> Self {
        Self {
            name,
            fields,
            warnings,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Warnings raised by the pattern analyzer while compiling.
    #[must_use]
    pub fn warnings(&self) -> &[PatternWarning] {
        &self.warnings
    }

    /// Total number of compiled steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.fields.iter().map(|f| f.steps.len()).sum()
    }
}

/// Plans of a schema set, keyed by schema name.
#[derive(Debug, Clone, Default)]
pub struct PlanSet {
    plans: HashMap<String, Arc<Plan>>,
}

impl PlanSet {
    pub(crate) fn new(plans: HashMap<String, Arc<Plan>>) -> Self {
        Self { plans }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Plan>> {
        self.plans.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.plans.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.values().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checkpoints_are_thresholds() {
        let field = CompiledField::new("x".into(), true, Vec::new(), vec![0, 2], None);
        assert!(field.stops_at(0));
        assert!(!field.stops_at(1));
        assert!(field.stops_at(2));
    }

    #[tokio::test]
    async fn explicit_key_beats_predicate_detail() {
        let ctx = ValidationContext::new();
        let default = CompiledStep::new(RuleKind::custom("c"), Matcher::Builtin, None);
        let keyed = CompiledStep::new(RuleKind::custom("c"), Matcher::Builtin, Some("required"));

        assert_eq!(default.message(Some("taken".into()), &ctx).await, "taken");
        assert_eq!(default.message(None, &ctx).await, "failed the c check");
        assert_eq!(keyed.message(Some("taken".into()), &ctx).await, "is required");
    }

    #[tokio::test]
    async fn pattern_matcher_requires_strings() {
        let ctx = ValidationContext::new();
        let step = CompiledStep::new(
            RuleKind::pattern("^a"),
            Matcher::Pattern(Regex::new("^a").unwrap()),
            None,
        );
        let ok = step.check(&json!("abc"), &Value::Null, &ctx).await.unwrap();
        let bad = step.check(&json!(1), &Value::Null, &ctx).await.unwrap();
        assert!(ok.is_valid());
        assert!(!bad.is_valid());
        assert_eq!(step.args(), ["^a".to_owned()]);
    }
}
