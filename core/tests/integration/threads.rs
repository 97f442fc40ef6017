use std::thread;

use serde_json::json;
use sharetree_core::{apply, prop, push, Mutation, Value};

#[test]
fn concurrent_calls_on_a_shared_model() {
    let model = Value::from(json!({ "items": [0] }));
    let append = |n: i32| -> Mutation { prop("items", push([n])) };

    let results: Vec<Value> = thread::scope(|s| {
        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let model = &model;
                let mutation = append(n);
                s.spawn(move || apply(model, mutation).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (n, result) in (1..=4).zip(&results) {
        assert_eq!(result, &Value::from(json!({ "items": [0, n] })));
    }
    assert_eq!(model, Value::from(json!({ "items": [0] })));
}

#[test]
fn one_mutation_many_threads() {
    let mutation = prop("items", push(["x"]));
    let models: Vec<Value> = (0..4).map(|n| Value::from(json!({ "items": [n] }))).collect();

    thread::scope(|s| {
        for model in &models {
            let mutation = &mutation;
            s.spawn(move || {
                let next = apply(model, mutation.clone()).unwrap();
                assert_eq!(next.field("items").unwrap().as_sequence().unwrap().len(), 2);
            });
        }
    });
}
