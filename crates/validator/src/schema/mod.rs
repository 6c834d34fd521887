//! The declarative schema model.
//!
//! A [`Schema`] names a validated type and lists its [`FieldRule`]s in
//! declaration order. Schemas are plain immutable data: build them with
//! [`Schema::builder`] or load them from JSON, then hand them to the
//! [`Compiler`](crate::plan::Compiler).
//!
//! ```rust,ignore
//! use warden_validator::schema::{RuleKind, Schema};
//!
//! let user = Schema::builder("User")
//!     .field("email", |f| f.rule(RuleKind::Required).rule(RuleKind::Email))
//!     .field("age", |f| f.rule(RuleKind::Required).rule(RuleKind::Min(18.0)))
//!     .build();
//! ```

mod field;
mod rule;

pub use field::{FieldRule, FieldRuleBuilder, NestedSpec};
pub use rule::{DEFAULT_JSON_DEPTH, IpFamily, RuleKind, RuleStep};
pub(crate) use rule::{display_value, format_number};

use serde::{Deserialize, Serialize};

/// Validation rules of one named type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldRule>,
}

impl Schema {
    /// Starts a builder for the schema `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Parses a schema document.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Fluent construction of a [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldRule>,
}

impl SchemaBuilder {
    /// Declares a field, configuring its rules in the closure.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(
        mut self,
        name: impl Into<String>,
        configure: impl FnOnce(FieldRuleBuilder) -> FieldRuleBuilder,
    ) -> Self {
        self.fields
            .push(configure(FieldRuleBuilder::new(name)).build());
        self
    }

    /// Declares a prepared field.
    #[must_use = "builder methods must be chained or built"]
    pub fn field_rule(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}
