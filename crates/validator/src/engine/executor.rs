//! Plan execution.
//!
//! One validation call runs one future per declared field and joins them in
//! declaration order. Each field future:
//!
//! 1. reads the field from the enclosing object (absent reads as null);
//! 2. holding a dispatcher permit, walks its steps in order. A null value
//!    skips every non-presence step, a failed step records its message and
//!    the walk goes on, and reaching a checkpoint after any failure stops
//!    the walk;
//! 3. releases the permit and, for a non-null value with a nested spec,
//!    recurses into the nested plan with `field.` or `field[i].` prefixes.
//!
//! Nothing is spawned: every future lives inside the call, and dropping the
//! call's future drops all of them.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::config::{EngineConfig, NestedPolicy};
use crate::engine::Dispatcher;
use crate::foundation::{
    ExecutionError, FieldPath, Outcome, SchemaError, ValidateError, ValidationContext,
    ValidationErrors,
};
use crate::plan::{CompiledField, Compiler, Plan, PlanSet};
use crate::predicates::{PredicateRegistry, Verdict};
use crate::schema::{NestedSpec, Schema};

const NOT_NULL: &str = "not_null";
const EXPECTED_OBJECT: &str = "expected_object";
const EXPECTED_ARRAY: &str = "expected_array";

static ABSENT: Value = Value::Null;

/// Types validated under a named schema.
///
/// ```rust,ignore
/// #[derive(Serialize)]
/// struct SignUp { email: String, age: u32 }
///
/// impl HasSchema for SignUp {
///     fn schema_name() -> &'static str { "SignUp" }
/// }
/// ```
pub trait HasSchema {
    fn schema_name() -> &'static str;
}

impl<T: HasSchema + ?Sized> HasSchema for &T {
    fn schema_name() -> &'static str {
        T::schema_name()
    }
}

/// Compiled plans plus engine settings; cheap to clone and share.
///
/// # Examples
///
/// ```rust,ignore
/// let validator = Validator::builder()
///     .schema(user_schema)
///     .registry(registry)
///     .build()?;
///
/// let ctx = validator.default_context().with_locale("es");
/// match validator.validate(sign_up, &ctx).await? {
///     Outcome::Success(user) => save(user).await,
///     Outcome::Failure(errors) => reply_422(errors),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    plans: Arc<PlanSet>,
    config: EngineConfig,
    dispatcher: Dispatcher,
}

impl Validator {
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Wraps plans compiled elsewhere.
    #[must_use]
    pub fn from_plans(plans: PlanSet, config: EngineConfig) -> Self {
        Self {
            dispatcher: config.dispatcher(),
            plans: Arc::new(plans),
            config,
        }
    }

    /// The compiled plan for `schema`.
    #[must_use]
    pub fn plan(&self, schema: &str) -> Option<&Plan> {
        self.plans.get(schema).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn plans(&self) -> &PlanSet {
        &self.plans
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A default context throttled by this validator's dispatcher.
    #[must_use]
    pub fn default_context(&self) -> ValidationContext {
        ValidationContext::new().with_dispatcher(self.dispatcher.clone())
    }

    /// Validates a typed value, returning it untouched on success.
    #[instrument(skip_all, fields(schema = T::schema_name(), locale = %ctx.locale()))]
    pub async fn validate<T>(
        &self,
        value: T,
        ctx: &ValidationContext,
    ) -> Result<Outcome<T>, ExecutionError>
    where
        T: HasSchema + Serialize,
    {
        let snapshot = serde_json::to_value(&value)?;
        let errors = self.collect(T::schema_name(), &snapshot, ctx).await?;
        Ok(Outcome::from_errors(value, errors))
    }

    /// Validates an untyped payload against the schema `schema`.
    #[instrument(skip_all, fields(schema = schema, locale = %ctx.locale()))]
    pub async fn validate_json(
        &self,
        schema: &str,
        value: Value,
        ctx: &ValidationContext,
    ) -> Result<Outcome<Value>, ExecutionError> {
        let errors = self.collect(schema, &value, ctx).await?;
        Ok(Outcome::from_errors(value, errors))
    }

    /// Throwing style: the value, or the error report as `Err`.
    pub async fn validate_or_throw<T>(
        &self,
        value: T,
        ctx: &ValidationContext,
    ) -> Result<T, ValidateError>
    where
        T: HasSchema + Serialize,
    {
        self.validate(value, ctx)
            .await?
            .into_result()
            .map_err(ValidateError::Invalid)
    }

    /// Runs `schema` against a borrowed payload and returns only the report.
    pub async fn errors(
        &self,
        schema: &str,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationErrors, ExecutionError> {
        self.collect(schema, value, ctx).await
    }

    async fn collect(
        &self,
        schema: &str,
        value: &Value,
        ctx: &ValidationContext,
    ) -> Result<ValidationErrors, ExecutionError> {
        let plan = self
            .plans
            .get(schema)
            .ok_or_else(|| ExecutionError::UnknownSchema(schema.to_owned()))?;
        let run = Run {
            plans: &self.plans,
            ctx,
            policy: self.config.nested_policy,
            max_depth: self.config.max_depth,
        };
        let errors = run.plan(plan, value, FieldPath::root(), 0).await?;
        debug!(
            failed_paths = errors.len(),
            messages = errors.message_count(),
            "validation finished"
        );
        Ok(errors)
    }
}

/// Collects schemas, predicates and settings for a [`Validator`].
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    schemas: Vec<Schema>,
    registry: PredicateRegistry,
    config: EngineConfig,
}

impl ValidatorBuilder {
    #[must_use = "builder methods must be chained or built"]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn schemas(mut self, schemas: impl IntoIterator<Item = Schema>) -> Self {
        self.schemas.extend(schemas);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn registry(mut self, registry: PredicateRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Compiles every schema; fails on the first schema error.
    pub fn build(self) -> Result<Validator, SchemaError> {
        let plans = Compiler::new(&self.registry)
            .with_analyzer(self.config.analyzer)
            .compile(&self.schemas)?;
        Ok(Validator::from_plans(plans, self.config))
    }
}

/// Borrowed state of one validation call.
#[derive(Clone, Copy)]
struct Run<'a> {
    plans: &'a PlanSet,
    ctx: &'a ValidationContext,
    policy: NestedPolicy,
    max_depth: usize,
}

impl<'a> Run<'a> {
    /// Validates `object` against `plan`; boxed because nesting recurses.
    fn plan(
        self,
        plan: &'a Plan,
        object: &'a Value,
        path: FieldPath,
        depth: usize,
    ) -> BoxFuture<'a, Result<ValidationErrors, ExecutionError>> {
        async move {
            if depth > self.max_depth {
                return Err(ExecutionError::DepthExceeded {
                    path: path.into_string(),
                    max_depth: self.max_depth,
                });
            }
            let fields = plan
                .fields()
                .iter()
                .map(|field| self.field(field, object, path.field(field.name()), depth));
            let mut errors = ValidationErrors::new();
            for field_errors in try_join_all(fields).await? {
                errors.merge(field_errors);
            }
            Ok(errors)
        }
        .boxed()
    }

    async fn field(
        self,
        field: &'a CompiledField,
        object: &'a Value,
        path: FieldPath,
        depth: usize,
    ) -> Result<ValidationErrors, ExecutionError> {
        let value = object.get(field.name()).unwrap_or(&ABSENT);

        let messages = {
            let _permit = self.ctx.dispatcher().acquire().await;
            self.chain(field, value, object, &path).await?
        };

        let local_failed = !messages.is_empty();
        let mut errors = ValidationErrors::new();
        errors.extend_path(path.as_str(), messages);

        if let Some(nested) = field.nested()
            && !value.is_null()
            && self.policy.allows(local_failed)
        {
            errors.merge(self.nested(nested, value, &path, depth).await?);
        }
        Ok(errors)
    }

    async fn chain(
        self,
        field: &CompiledField,
        value: &Value,
        parent: &Value,
        path: &FieldPath,
    ) -> Result<Vec<String>, ExecutionError> {
        let mut messages = Vec::new();
        if value.is_null() && !field.nullable() {
            messages.push(self.ctx.message(NOT_NULL, &[]).await);
        }
        let mut failed = !messages.is_empty();

        for (position, step) in field.steps().iter().enumerate() {
            if failed && field.stops_at(position) {
                break;
            }
            if value.is_null() && !step.kind().is_presence() {
                continue;
            }
            let verdict = step.check(value, parent, self.ctx).await.map_err(|source| {
                ExecutionError::Predicate {
                    predicate: step.predicate_name().to_owned(),
                    path: path.to_string(),
                    source,
                }
            })?;
            if let Verdict::Invalid(detail) = verdict {
                trace!(path = %path, rule = step.kind().name(), "rule failed");
                messages.push(step.message(detail, self.ctx).await);
                failed = true;
            }
        }
        Ok(messages)
    }

    async fn nested(
        self,
        spec: &'a NestedSpec,
        value: &'a Value,
        path: &FieldPath,
        depth: usize,
    ) -> Result<ValidationErrors, ExecutionError> {
        let plan = self
            .plans
            .get(&spec.schema)
            .ok_or_else(|| ExecutionError::UnknownSchema(spec.schema.clone()))?;

        if !spec.each_element {
            return self.object(plan, value, path.clone(), depth + 1).await;
        }

        let Some(items) = value.as_array() else {
            return Ok(self.shape_error(path, EXPECTED_ARRAY).await);
        };
        let elements = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(index, item)| self.object(plan, item, path.index(index), depth + 1));

        let mut errors = ValidationErrors::new();
        for element_errors in try_join_all(elements).await? {
            errors.merge(element_errors);
        }
        Ok(errors)
    }

    async fn object(
        self,
        plan: &'a Plan,
        value: &'a Value,
        path: FieldPath,
        depth: usize,
    ) -> Result<ValidationErrors, ExecutionError> {
        if value.is_object() {
            self.plan(plan, value, path, depth).await
        } else {
            Ok(self.shape_error(&path, EXPECTED_OBJECT).await)
        }
    }

    async fn shape_error(self, path: &FieldPath, key: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.push(path.as_str(), self.ctx.message(key, &[]).await);
        errors
    }
}
