//! Tests for sharing validators and registries across tasks and threads.

use rulebook::{create_validator, each, rules, Entry, RuleRegistry, RuleSchema};
use serde_json::json;
use std::sync::Arc;
use std::thread;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validation() {
    let registry = RuleRegistry::new();

    registry
        .register(
            "User",
            RuleSchema::new()
                .field("name", rules::is_string())
                .field("age", [rules::is_integer(), rules::min_value(0.0)]),
        )
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                let result = registry
                    .validate("User", &json!({ "name": format!("User{}", i), "age": 20 + i }))
                    .await
                    .unwrap();
                assert!(result.is_success());
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_validator_keeps_calls_independent() {
    let validator = create_validator(
        RuleSchema::new().field("values", each([rules::is_integer(), rules::max_value(10.0)])),
    );

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let validator = validator.clone();
            tokio::spawn(async move {
                let data = json!({ "values": [i, i + 1] });
                let result = validator.validate(&data).await.unwrap();
                (i, result.into_result().err())
            })
        })
        .collect();

    for handle in handles {
        let (i, errors) = handle.await.unwrap();
        match errors {
            None => assert!(i + 1 <= 10),
            Some(errors) => {
                let items = errors.get("values").unwrap().as_items().unwrap();
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].is_some(), i > 10);
                assert!(items[1].is_some());
            }
        }
    }
}

#[test]
fn test_concurrent_registry_access() {
    let registry = Arc::new(RuleRegistry::new());

    registry.register("Email", rules::is_email()).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                assert!(registry.get("Email").is_some());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration() {
    let registry = RuleRegistry::new();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry
                    .register(format!("Entry{}", i), rules::is_string())
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..10 {
        assert!(registry.contains(&format!("Entry{}", i)));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validation_with_refs() {
    let registry = RuleRegistry::new();

    registry
        .register("Address", RuleSchema::new().field("city", rules::required()))
        .unwrap();
    registry
        .register(
            "Customer",
            RuleSchema::new()
                .field("name", rules::required())
                .field("address", Entry::reference("Address")),
        )
        .unwrap();

    let validator = registry.validator("Customer").unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = validator.clone();
            tokio::spawn(async move {
                let data = if i % 2 == 0 {
                    json!({ "name": "Ann", "address": { "city": "Oslo" } })
                } else {
                    json!({ "name": "Bob", "address": {} })
                };
                let result = validator.validate(&data).await.unwrap();
                assert_eq!(result.is_success(), i % 2 == 0);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
}

#[test]
fn test_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<RuleRegistry>();
    assert_send_sync::<RuleSchema>();
    assert_send_sync::<rulebook::Validator>();
    assert_send_sync::<rulebook::ErrorTree>();
    assert_send_sync::<rulebook::ValidatorError>();
}
