use pretty_assertions::assert_eq;
use serde_json::json;
use sharetree_core::{
    apply, merge, prop, push, result, reverse, set, splice, Context, Value,
};

use crate::{init_logger, NodeCounter};

fn todos() -> Value {
    Value::from(json!({
        "ids": [1],
        "entities": { "1": "todo 1" },
    }))
}

#[test]
fn set_field() {
    let original = Value::from(json!({ "title": "todo" }));
    let next = apply(&original, set("title", "new todo")).unwrap();
    assert_eq!(next, Value::from(json!({ "title": "new todo" })));
}

#[test]
fn set_index() {
    let original = Value::from(json!([1, 2, 3]));
    let next = apply(&original, set(1usize, 100)).unwrap();
    assert_eq!(next, Value::from(json!([1, 100, 3])));
}

#[test]
fn prop_name() {
    let original = Value::from(json!({ "todo": { "title": "todo" } }));
    let next = apply(&original, prop("todo", set("title", "new todo"))).unwrap();
    assert_eq!(next, Value::from(json!({ "todo": { "title": "new todo" } })));
}

#[test]
fn merge_new_props() {
    let original = Value::from(json!({ "a": 1, "b": 2, "c": 3 }));
    let next = apply(&original, merge([json!({ "d": 4 })])).unwrap();
    assert_eq!(next, Value::from(json!({ "a": 1, "b": 2, "c": 3, "d": 4 })));
}

#[test]
fn reverse_sequence() {
    let original = Value::from(json!([1, 2, 3]));
    assert_eq!(apply(&original, reverse()).unwrap(), Value::from(json!([3, 2, 1])));
}

#[test]
fn add_todo() {
    init_logger();

    let counter = NodeCounter::default();
    let original = todos();
    let mut ctx = Context::default();

    let next = ctx
        .apply(
            original.clone(),
            [
                prop("ids", push([2, 3])),
                counter.inject(),
                prop("entities", merge([json!({ "2": "todo 2", "3": "todo 3" })])),
                counter.inject(),
            ],
        )
        .unwrap();

    assert_eq!(
        next,
        Value::from(json!({
            "ids": [1, 2, 3],
            "entities": { "1": "todo 1", "2": "todo 2", "3": "todo 3" },
        }))
    );
    // The root was cloned once and then updated in place.
    assert_eq!(counter.count(), 1);
    assert_eq!(ctx.clone_count(), 3);
    assert_eq!(original, todos());
}

#[test]
fn many_writes_clone_each_node_once() {
    let original = todos();
    let mut ctx = Context::default();
    let mutations: Vec<_> = (2..50)
        .flat_map(|id| {
            [
                prop("ids", push([id])),
                prop("entities", set(id.to_string(), format!("todo {id}"))),
            ]
        })
        .collect();

    let next = ctx.apply(original.clone(), mutations).unwrap();

    assert_eq!(next.field("ids").unwrap().as_sequence().unwrap().len(), 49);
    assert_eq!(next.field("entities").unwrap().as_record().unwrap().len(), 49);
    assert_eq!(ctx.clone_count(), 3);
}

#[test]
fn splice_delete() {
    let original = Value::from(json!([1, 2, 3, 4]));
    let next = apply(&original, splice(1, 2, Vec::<Value>::new())).unwrap();
    assert_eq!(next, Value::from(json!([1, 4])));
}

#[test]
fn splice_insert() {
    let original = Value::from(json!([1, 2, 3, 4]));
    let next = apply(&original, splice(1, 2, [1, 1])).unwrap();
    assert_eq!(next, Value::from(json!([1, 1, 1, 4])));
}

#[test]
fn splice_without_change() {
    let original = Value::from(json!([1, 2, 3, 4]));
    let next = apply(&original, splice(1, 2, [2, 3])).unwrap();
    assert!(next.identical(&original));
}

#[test]
fn result_without_continuation() {
    let original = Value::from(json!([1, 2, 3, 4]));
    let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
    let sink = seen.clone();

    let next = apply(
        &original,
        [
            splice(1, 2, [2, 3]),
            result(move |removed, _| {
                *sink.lock().unwrap() = removed.cloned();
                None
            }),
        ],
    )
    .unwrap();

    assert!(next.identical(&original));
    assert_eq!(*seen.lock().unwrap(), Some(Value::from(json!([2, 3]))));
}

#[test]
fn result_continues() {
    let original = Value::from(json!([1, 2, 3, 4]));
    let next = apply(
        &original,
        [
            splice(1, 2, [2, 3]),
            result(|removed, _| {
                let removed = removed?.as_sequence()?.clone();
                Some(vec![push(removed)])
            }),
        ],
    )
    .unwrap();
    assert_eq!(next, Value::from(json!([1, 2, 3, 4, 2, 3])));
}
