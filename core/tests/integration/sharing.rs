use pretty_assertions::assert_eq;
use serde_json::json;
use sharetree_core::{
    apply, apply_with, filter, prop, set, toggle, Config, Error, Segment, UnmatchedPolicy, Value,
};

#[test]
fn untouched_siblings_are_shared() {
    let original = Value::from(json!({ "a": { "x": 1 }, "b": { "y": 2 } }));
    let next = apply(&original, prop("a", set("x", 2))).unwrap();

    assert_eq!(next, Value::from(json!({ "a": { "x": 2 }, "b": { "y": 2 } })));
    assert!(next.field("b").unwrap().identical(original.field("b").unwrap()));
    assert!(!next.field("a").unwrap().identical(original.field("a").unwrap()));
}

#[test]
fn noop_propagates_to_the_root() {
    let original = Value::from(json!({
        "lists": { "todo": [{ "done": true }, { "done": true }] },
    }));
    let next = apply(
        &original,
        prop(
            ["lists", "todo"],
            filter(|todo, _| todo.field("done") == Some(&Value::from(true))),
        ),
    )
    .unwrap();
    assert!(next.identical(&original));
}

#[test]
fn predicate_paths() {
    let original = Value::from(json!({
        "todos": [{ "id": 1, "done": false }, { "id": 2, "done": false }],
    }));
    let by_id = |id: i64| Segment::matching(move |todo, _| todo.field("id") == Some(&Value::from(id)));

    let next = apply(
        &original,
        prop(["todos".into(), by_id(2), "done".into()], toggle()),
    )
    .unwrap();
    assert_eq!(
        next.field("todos").unwrap().at(1).unwrap().field("done"),
        Some(&Value::from(true))
    );

    let missing = prop(["todos".into(), by_id(3), "done".into()], toggle());
    assert!(apply(&original, missing.clone()).unwrap().identical(&original));

    let strict = Config::from_toml_str("unmatched_predicate = \"fail\"").unwrap();
    assert_eq!(strict.unmatched_predicate, UnmatchedPolicy::Fail);
    assert_eq!(
        apply_with(&original, missing, &strict),
        Err(Error::UnmatchedPredicate { len: 2 })
    );
}
