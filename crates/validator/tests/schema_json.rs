//! Schemas and engine settings loaded from JSON documents.

use pretty_assertions::assert_eq;
use serde_json::json;
use warden_validator::prelude::*;

const ORDER: &str = r#"{
    "name": "Order",
    "fields": [
        {
            "name": "reference",
            "nullable": false,
            "steps": [
                {"rule": "pattern", "value": "^ORD-[0-9]{6}$", "message": "bad_reference"}
            ]
        },
        {
            "name": "lines",
            "steps": [{"rule": "min_size", "value": 1}],
            "nested": {"schema": "Line", "each_element": true}
        }
    ]
}"#;

const LINE: &str = r#"{
    "name": "Line",
    "fields": [
        {
            "name": "quantity",
            "steps": [
                {"rule": "required"},
                {"rule": "positive"},
                {"rule": "range", "value": {"min": 1, "max": 100}}
            ],
            "checkpoints": [1]
        },
        {"name": "warehouse", "steps": [{"rule": "ip_address", "value": "v4"}]}
    ]
}"#;

fn order_validator(config: EngineConfig) -> Validator {
    let schemas = [
        Schema::from_json_str(ORDER).unwrap(),
        Schema::from_json_str(LINE).unwrap(),
    ];
    Validator::builder()
        .schemas(schemas)
        .config(config)
        .build()
        .unwrap()
}

#[tokio::test]
async fn json_schemas_validate_like_built_ones() {
    let validator = order_validator(EngineConfig::default());
    let ctx = validator.default_context();

    let outcome = validator
        .validate_json(
            "Order",
            json!({
                "reference": "ORD-12",
                "lines": [
                    {"quantity": 3, "warehouse": "10.0.0.1"},
                    {"warehouse": " 10.0.0.1"},
                    {"quantity": 500}
                ]
            }),
            &ctx,
        )
        .await
        .unwrap();

    let expected: ValidationErrors = [
        ("reference", "bad_reference"),
        ("lines[1].quantity", "is required"),
        ("lines[1].warehouse", "must be a valid IPv4 address"),
        ("lines[2].quantity", "must be between 1 and 100"),
    ]
    .into_iter()
    .map(|(path, message)| (path.to_owned(), message.to_owned()))
    .collect();
    assert_eq!(outcome.errors().cloned().unwrap(), expected);
}

#[tokio::test]
async fn engine_config_loads_from_json() {
    let config = EngineConfig::from_json_str(
        r#"{"max_concurrency": 2, "nested_policy": "skip_on_local_failure"}"#,
    )
    .unwrap();
    assert_eq!(config.max_concurrency, 2);
    assert_eq!(config.nested_policy, NestedPolicy::SkipOnLocalFailure);

    let validator = order_validator(config);
    let ctx = validator.default_context();
    assert_eq!(ctx.dispatcher().capacity(), Some(2));

    let outcome = validator
        .validate_json("Order", json!({"reference": "ORD-000001", "lines": []}), &ctx)
        .await
        .unwrap();

    let errors = outcome.errors().cloned().unwrap();
    assert_eq!(errors.paths().collect::<Vec<_>>(), ["lines"]);
}

#[test]
fn plans_expose_their_shape() {
    let validator = order_validator(EngineConfig::default());

    let line = validator.plan("Line").unwrap();
    let names: Vec<_> = line.fields().iter().map(|f| f.name()).collect();

    assert_eq!(names, ["quantity", "warehouse"]);
    assert_eq!(line.step_count(), 4);
    assert_eq!(line.field("quantity").unwrap().checkpoints(), [1]);
    assert!(validator.plan("Missing").is_none());
}

#[test]
fn unresolved_references_fail_the_whole_set() {
    let order = Schema::from_json_str(ORDER).unwrap();

    let err = Validator::builder().schema(order).build().unwrap_err();

    assert_eq!(
        err,
        SchemaError::UnknownNestedSchema {
            schema: "Order".into(),
            field: "lines".into(),
            target: "Line".into(),
        }
    );
}
