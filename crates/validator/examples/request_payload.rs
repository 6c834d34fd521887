//! Validating sign-up request payloads.
//!
//! Run with `RUST_LOG=warden_validator=debug cargo run --example request_payload`
//! to see compilation and validation spans.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use warden_validator::prelude::*;

#[derive(Debug, Serialize)]
struct SignUp {
    username: String,
    email: String,
    age: u32,
    addresses: Vec<Address>,
}

#[derive(Debug, Serialize)]
struct Address {
    city: String,
    postcode: String,
}

impl HasSchema for SignUp {
    fn schema_name() -> &'static str {
        "SignUp"
    }
}

fn schemas() -> Vec<Schema> {
    vec![
        Schema::builder("SignUp")
            .field("username", |f| {
                f.non_null()
                    .rule(RuleKind::Length { min: 3, max: 20 })
                    .checkpoint()
                    .rule(RuleKind::pattern("^[a-z0-9_]+$"))
                    .rule(RuleKind::custom("available_username"))
            })
            .field("email", |f| f.rule(RuleKind::Required).rule(RuleKind::Email))
            .field("age", |f| f.rule(RuleKind::Required).rule(RuleKind::Min(18.0)))
            .field("addresses", |f| f.rule(RuleKind::MaxSize(3)).each("Address"))
            .build(),
        Schema::builder("Address")
            .field("city", |f| f.rule(RuleKind::NotBlank))
            .field("postcode", |f| f.rule(RuleKind::pattern(r"^\d{5}$")))
            .build(),
    ]
}

fn registry() -> PredicateRegistry {
    PredicateRegistry::new().with_fn("available_username", |value: &Value, _: &Value| {
        !matches!(value.as_str(), Some("admin" | "root"))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let validator = Arc::new(
        Validator::builder()
            .schemas(schemas())
            .registry(registry())
            .build()
            .context("compiling schemas")?,
    );

    for plan in validator.plans().iter() {
        println!("plan {}: {} steps", plan.name(), plan.step_count());
        for warning in plan.warnings() {
            println!("  warning on {}: {}", warning.field, warning.message);
        }
    }

    let ctx = validator.default_context();
    let good = SignUp {
        username: "ada_l".into(),
        email: "ada@example.com".into(),
        age: 36,
        addresses: vec![Address {
            city: "London".into(),
            postcode: "12345".into(),
        }],
    };
    let user = validator.validate_or_throw(good, &ctx).await?;
    println!("accepted {}", user.username);

    let bad = SignUp {
        username: "admin".into(),
        email: "admin@".into(),
        age: 12,
        addresses: vec![
            Address {
                city: "Paris".into(),
                postcode: "75001".into(),
            },
            Address {
                city: " ".into(),
                postcode: "N1".into(),
            },
        ],
    };
    for locale in ["en", "es", "de"] {
        let outcome = validator
            .validate(&bad, &ctx.with_locale(locale))
            .await
            .context("running validation")?;
        if let Some(errors) = outcome.errors() {
            println!("[{locale}] {}", serde_json::to_string_pretty(errors)?);
        }
    }

    let raw = json!({"username": null, "email": "x@example.com", "age": 20});
    let outcome = validator.validate_json("SignUp", raw, &ctx).await?;
    println!("raw payload: {}", outcome.errors().map_or("ok".into(), ToString::to_string));

    Ok(())
}
