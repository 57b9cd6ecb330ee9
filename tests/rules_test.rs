//! Built-in rules used through schemas.

use rulebook::{conditions, rules, validate, when, ErrorTree, RuleSchema};
use serde_json::{json, Value};

async fn errors_for(schema: &RuleSchema, data: Value) -> Option<ErrorTree> {
    validate(schema, &data).await.unwrap().into_result().err()
}

fn signup_schema() -> RuleSchema {
    RuleSchema::new()
        .field("email", [rules::required(), rules::is_email()])
        .field("password", [rules::required(), rules::min_length(8), rules::max_length(64)])
        .field("repeatPassword", rules::same_as("password"))
        .field("age", [rules::required(), rules::is_integer(), rules::min_value(18.0)])
        .field("terms", rules::equals(true))
        .field("name", when(conditions::is_defined(), rules::is_alpha()))
        .field("birthday", when(conditions::is_defined(), rules::is_date()))
}

#[tokio::test]
async fn test_signup_passes() {
    let errors = errors_for(
        &signup_schema(),
        json!({
            "email": "jane@example.com",
            "password": "correct horse",
            "repeatPassword": "correct horse",
            "age": 30,
            "terms": true,
            "name": "O'Brien",
            "birthday": "1994-02-17"
        }),
    )
    .await;

    assert!(errors.is_none(), "{:?}", errors);
}

#[tokio::test]
async fn test_signup_collects_every_failing_field() {
    let errors = errors_for(
        &signup_schema(),
        json!({
            "email": "jane@",
            "password": "short",
            "repeatPassword": "different",
            "age": "17",
            "terms": false,
            "birthday": "17/02/1994"
        }),
    )
    .await
    .unwrap();

    assert_eq!(
        errors.to_json(),
        json!({
            "email": "Enter valid email address",
            "password": "Must be at least 8 characters",
            "repeatPassword": "Must match password",
            "age": "Must be an integer",
            "terms": "Must match true",
            "birthday": "Must be a date in YYYY-MM-DD format"
        })
    );
}

#[tokio::test]
async fn test_numeric_strings_meet_bounds() {
    let schema = RuleSchema::new().field("quantity", [rules::min_value(1.0), rules::max_value(10.0)]);

    assert!(errors_for(&schema, json!({ "quantity": "5" })).await.is_none());

    let errors = errors_for(&schema, json!({ "quantity": "12" })).await.unwrap();
    assert_eq!(
        errors.get("quantity").unwrap().as_message(),
        Some("Must be at most 10")
    );
}

#[tokio::test]
async fn test_type_checks() {
    let schema = RuleSchema::new()
        .field("name", rules::is_string())
        .field("price", rules::is_number())
        .field("ratio", rules::is_float())
        .field("active", rules::is_boolean())
        .field("tags", rules::is_array())
        .field("meta", rules::is_plain_object());

    let valid = json!({
        "name": "Widget",
        "price": 10,
        "ratio": 0.25,
        "active": false,
        "tags": [],
        "meta": {}
    });
    assert!(errors_for(&schema, valid).await.is_none());

    let errors = errors_for(
        &schema,
        json!({
            "name": 1,
            "price": "10",
            "ratio": 1,
            "active": "yes",
            "tags": {},
            "meta": []
        }),
    )
    .await
    .unwrap();

    assert_eq!(
        errors.to_json(),
        json!({
            "name": "Must be string",
            "price": "Must be a number",
            "ratio": "Must be a float",
            "active": "Must be boolean",
            "tags": "Must be an array",
            "meta": "Must be an object"
        })
    );
}

#[tokio::test]
async fn test_lengths_apply_to_arrays() {
    let schema = RuleSchema::new().field("seats", [rules::min_length(2), rules::max_length(4)]);

    assert!(errors_for(&schema, json!({ "seats": [1, 2] })).await.is_none());
    assert!(errors_for(&schema, json!({})).await.is_none());

    let errors = errors_for(&schema, json!({ "seats": [1, 2, 3, 4, 5] })).await.unwrap();
    assert_eq!(
        errors.get("seats").unwrap().as_message(),
        Some("Must contain no more than 4 items")
    );
}
