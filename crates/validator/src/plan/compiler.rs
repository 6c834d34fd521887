//! Schema to plan compilation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::foundation::SchemaError;
use crate::pattern::{AnalyzerConfig, PatternAnalyzer, PatternCache, RejectReason};
use crate::plan::compiled::{CompiledField, CompiledStep, Matcher, PatternWarning, Plan, PlanSet};
use crate::predicates::PredicateRegistry;
use crate::schema::{FieldRule, RuleKind, RuleStep, Schema};

/// Deepest nesting limit a `json_string` rule may ask for.
pub const MAX_JSON_DEPTH: usize = 1024;

/// Compiles schemas against a predicate registry.
///
/// Compilation is all-or-nothing: the first invalid field aborts it and no
/// plan is returned.
///
/// # Examples
///
/// ```rust,ignore
/// let registry = PredicateRegistry::new();
/// let plans = Compiler::new(&registry).compile(&[user, address])?;
/// assert!(plans.contains("User"));
/// ```
#[derive(Debug, Clone)]
pub struct Compiler<'r> {
    registry: &'r PredicateRegistry,
    analyzer: PatternAnalyzer,
    cache: &'r PatternCache,
}

impl<'r> Compiler<'r> {
    /// A compiler with the default analyzer and the global pattern cache.
    #[must_use]
    pub fn new(registry: &'r PredicateRegistry) -> Self {
        Self {
            registry,
            analyzer: PatternAnalyzer::default(),
            cache: PatternCache::global(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_analyzer(mut self, config: AnalyzerConfig) -> Self {
        self.analyzer = PatternAnalyzer::new(config);
        self
    }

    /// Uses a private pattern cache instead of the global one.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cache(mut self, cache: &'r PatternCache) -> Self {
        self.cache = cache;
        self
    }

    /// Compiles a schema set; nested specs may refer to any schema in it.
    #[instrument(skip_all, fields(schemas = schemas.len()))]
    pub fn compile(&self, schemas: &[Schema]) -> Result<PlanSet, SchemaError> {
        let mut known = HashSet::with_capacity(schemas.len());
        for schema in schemas {
            if !known.insert(schema.name()) {
                return Err(SchemaError::DuplicateSchema {
                    schema: schema.name().to_owned(),
                });
            }
        }

        let mut plans = HashMap::with_capacity(schemas.len());
        for schema in schemas {
            let plan = self.compile_schema(schema, &known)?;
            plans.insert(schema.name().to_owned(), Arc::new(plan));
        }

        let plans = PlanSet::new(plans);
        debug!(
            schemas = plans.len(),
            fields = plans.iter().map(|p| p.fields().len()).sum::<usize>(),
            steps = plans.iter().map(Plan::step_count).sum::<usize>(),
            "compiled plan set"
        );
        Ok(plans)
    }

    /// Compiles a single schema; its nested specs may only refer to itself.
    pub fn compile_one(&self, schema: &Schema) -> Result<Plan, SchemaError> {
        self.compile_schema(schema, &HashSet::from([schema.name()]))
    }

    fn compile_schema(&self, schema: &Schema, known: &HashSet<&str>) -> Result<Plan, SchemaError> {
        let mut seen = HashSet::with_capacity(schema.fields().len());
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut warnings = Vec::new();

        for field in schema.fields() {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    schema: schema.name().to_owned(),
                    field: field.name().to_owned(),
                });
            }
            fields.push(self.compile_field(schema.name(), field, known, &mut warnings)?);
        }

        for warning in &warnings {
            warn!(
                schema = schema.name(),
                field = %warning.field,
                pattern = %warning.pattern,
                "{}",
                warning.message
            );
        }
        Ok(Plan::new(schema.name().to_owned(), fields, warnings))
    }

    fn compile_field(
        &self,
        schema: &str,
        field: &FieldRule,
        known: &HashSet<&str>,
        warnings: &mut Vec<PatternWarning>,
    ) -> Result<CompiledField, SchemaError> {
        let steps_len = field.steps().len();
        if let Some(&position) = field.checkpoints().iter().find(|&&p| p > steps_len) {
            return Err(SchemaError::CheckpointOutOfRange {
                schema: schema.to_owned(),
                field: field.name().to_owned(),
                position,
                steps: steps_len,
            });
        }

        if let Some(nested) = field.nested()
            && !known.contains(nested.schema.as_str())
        {
            return Err(SchemaError::UnknownNestedSchema {
                schema: schema.to_owned(),
                field: field.name().to_owned(),
                target: nested.schema.clone(),
            });
        }

        let steps = field
            .steps()
            .iter()
            .map(|step| self.compile_step(schema, field.name(), step, warnings))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledField::new(
            field.name().to_owned(),
            field.nullable(),
            steps,
            field.checkpoints().iter().copied().collect(),
            field.nested().cloned(),
        ))
    }

    fn compile_step(
        &self,
        schema: &str,
        field: &str,
        step: &RuleStep,
        warnings: &mut Vec<PatternWarning>,
    ) -> Result<CompiledStep, SchemaError> {
        check_parameters(&step.kind).map_err(|message| SchemaError::InvalidParameter {
            schema: schema.to_owned(),
            field: field.to_owned(),
            rule: step.kind.name(),
            message,
        })?;

        let matcher = match &step.kind {
            RuleKind::Pattern(pattern) => {
                let admitted = self
                    .cache
                    .get_or_admit(pattern, &self.analyzer)
                    .map_err(|rejection| match rejection.reason {
                        RejectReason::InvalidSyntax => SchemaError::InvalidPattern {
                            schema: schema.to_owned(),
                            field: field.to_owned(),
                            pattern: pattern.clone(),
                            message: rejection.message,
                        },
                        reason => SchemaError::UnsafePattern {
                            schema: schema.to_owned(),
                            field: field.to_owned(),
                            pattern: pattern.clone(),
                            reason,
                            message: rejection.message,
                        },
                    })?;
                if let Some(message) = admitted.warning {
                    warnings.push(PatternWarning {
                        field: field.to_owned(),
                        pattern: pattern.clone(),
                        message,
                    });
                }
                Matcher::Pattern(admitted.regex)
            }
            RuleKind::Custom(name) => {
                let predicate =
                    self.registry
                        .resolve(name)
                        .ok_or_else(|| SchemaError::UnresolvedPredicate {
                            schema: schema.to_owned(),
                            field: field.to_owned(),
                            name: name.clone(),
                        })?;
                Matcher::Custom(predicate)
            }
            _ => Matcher::Builtin,
        };

        Ok(CompiledStep::new(
            step.kind.clone(),
            matcher,
            step.message.as_deref(),
        ))
    }
}

/// Structural checks on rule parameters.
fn check_parameters(kind: &RuleKind) -> Result<(), String> {
    match kind {
        RuleKind::Length { min, max } if min > max => {
            Err(format!("min ({min}) is greater than max ({max})"))
        }
        RuleKind::Range { min, max } if min.is_nan() || max.is_nan() => {
            Err("bound is not a number".into())
        }
        RuleKind::Range { min, max } if min > max => {
            Err(format!("min ({min}) is greater than max ({max})"))
        }
        RuleKind::Min(n) | RuleKind::Max(n) if n.is_nan() => Err("bound is not a number".into()),
        RuleKind::DivisibleBy(0) => Err("divisor must not be zero".into()),
        RuleKind::OneOf(values) if values.is_empty() => {
            Err("at least one allowed value is required".into())
        }
        RuleKind::JsonString { max_depth } if !(1..=MAX_JSON_DEPTH).contains(max_depth) => Err(
            format!("max_depth must be between 1 and {MAX_JSON_DEPTH}, got {max_depth}"),
        ),
        RuleKind::Custom(name) if name.is_empty() => Err("predicate name is empty".into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn schema_with(kind: RuleKind) -> Schema {
        Schema::builder("S").field("f", |f| f.rule(kind)).build()
    }

    fn compile(schemas: &[Schema]) -> Result<PlanSet, SchemaError> {
        Compiler::new(&PredicateRegistry::new()).compile(schemas)
    }

    #[test]
    fn compiles_fields_in_order() {
        let schema = Schema::builder("User")
            .field("email", |f| f.rule(RuleKind::Required).checkpoint().rule(RuleKind::Email))
            .field("name", |f| f.rule(RuleKind::pattern("^[A-Z][a-z]+$")))
            .build();
        let plans = compile(&[schema]).unwrap();
        let plan = plans.get("User").unwrap();

        let names: Vec<_> = plan.fields().iter().map(CompiledField::name).collect();
        assert_eq!(names, vec!["email", "name"]);
        assert_eq!(plan.field("email").unwrap().checkpoints(), [1]);
        assert_eq!(plan.step_count(), 3);
        assert_eq!(plan.warnings().len(), 1);
        assert_eq!(plan.warnings()[0].field, "name");
    }

    #[test]
    fn unsafe_pattern_aborts_everything() {
        let good = schema_with(RuleKind::Email);
        let bad = Schema::builder("Bad")
            .field("f", |f| f.rule(RuleKind::pattern("(a+)+")))
            .build();
        let err = compile(&[good, bad]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsafePattern {
                reason: RejectReason::NestedQuantifiers,
                ..
            }
        ));
        assert!(err.to_string().contains("nested quantifiers"));
    }

    #[test]
    fn invalid_syntax_is_reported_separately() {
        let err = compile(&[schema_with(RuleKind::pattern("[unclosed"))]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
    }

    #[test]
    fn custom_names_resolve_at_compile_time() {
        let schema = schema_with(RuleKind::custom("known"));
        let err = compile(std::slice::from_ref(&schema)).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnresolvedPredicate {
                schema: "S".into(),
                field: "f".into(),
                name: "known".into(),
            }
        );

        let registry = PredicateRegistry::new().with_fn("known", |_, _| true);
        assert!(Compiler::new(&registry).compile(&[schema]).is_ok());
    }

    #[rstest]
    #[case(RuleKind::Range { min: 5.0, max: 1.0 })]
    #[case(RuleKind::Length { min: 3, max: 2 })]
    #[case(RuleKind::DivisibleBy(0))]
    #[case(RuleKind::OneOf(vec![]))]
    #[case(RuleKind::JsonString { max_depth: 0 })]
    #[case(RuleKind::Min(f64::NAN))]
    fn invalid_parameters(#[case] kind: RuleKind) {
        let err = compile(&[schema_with(kind)]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidParameter { .. }), "{err}");
    }

    #[test]
    fn structural_errors() {
        let out_of_range = Schema::builder("S")
            .field("f", |f| f.rule(RuleKind::Required).checkpoint_at(2))
            .build();
        assert!(matches!(
            compile(&[out_of_range]).unwrap_err(),
            SchemaError::CheckpointOutOfRange {
                position: 2,
                steps: 1,
                ..
            }
        ));

        let duplicate_field = Schema::builder("S")
            .field("f", |f| f)
            .field("f", |f| f)
            .build();
        assert!(matches!(
            compile(&[duplicate_field]).unwrap_err(),
            SchemaError::DuplicateField { .. }
        ));

        let a = Schema::builder("S").build();
        assert_eq!(
            compile(&[a.clone(), a]).unwrap_err(),
            SchemaError::DuplicateSchema { schema: "S".into() }
        );

        let dangling = Schema::builder("S").field("child", |f| f.nested("Missing")).build();
        assert!(matches!(
            compile(&[dangling]).unwrap_err(),
            SchemaError::UnknownNestedSchema { .. }
        ));
    }

    #[test]
    fn compile_one_allows_self_reference() {
        let tree = Schema::builder("Node")
            .field("children", |f| f.each("Node"))
            .build();
        let plan = Compiler::new(&PredicateRegistry::new())
            .compile_one(&tree)
            .unwrap();
        assert_eq!(plan.name(), "Node");
    }
}
