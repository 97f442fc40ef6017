use pretty_assertions::assert_eq;
use serde_json::json;
use sharetree_core::{apply, merge, prop, push, reverse, set, unset, val, Error, Value};

#[test]
fn set_identical_value() {
    let inner = Value::from(json!({ "deep": [1, 2] }));
    let record = Value::record([("key", inner.clone()), ("n", Value::from(1))]);

    assert!(apply(&record, set("key", inner)).unwrap().identical(&record));
    assert!(apply(&record, set("n", 1)).unwrap().identical(&record));
}

#[test]
fn double_reversal() {
    let seq = Value::from(json!([1, { "a": 2 }, [3]]));

    let once = apply(&seq, reverse()).unwrap();
    let twice = apply(&once, reverse()).unwrap();
    // Across calls, the elements are shared but the sequence is a new one.
    assert_eq!(twice, seq);
    assert!(twice.at(1).unwrap().identical(seq.at(1).unwrap()));

    assert!(apply(&seq, [reverse(), reverse()]).unwrap().identical(&seq));
}

#[test]
fn merge_idempotence() {
    let original = Value::from(json!({ "a": 1, "b": { "c": [2] } }));
    let next = apply(&original, merge([original.clone(), original.clone()])).unwrap();
    assert!(next.identical(&original));
}

#[test]
fn deletion_of_missing_key() {
    let record = Value::from(json!({ "a": 1 }));
    assert!(apply(&record, unset(["missing"])).unwrap().identical(&record));
}

#[test]
fn deep_path_write() {
    let original = Value::from(json!({
        "p1": { "p2": { "p3": "a" }, "sibling": { "x": 1 } },
        "other": [1, 2],
    }));
    let next = apply(&original, prop(["p1", "p2", "p3"], val("b"))).unwrap();

    assert_eq!(
        next,
        Value::from(json!({
            "p1": { "p2": { "p3": "b" }, "sibling": { "x": 1 } },
            "other": [1, 2],
        }))
    );
    let p1 = |v: &Value| v.field("p1").unwrap().clone();
    assert!(p1(&next).field("sibling").unwrap().identical(p1(&original).field("sibling").unwrap()));
    assert!(next.field("other").unwrap().identical(original.field("other").unwrap()));
}

#[test]
fn kind_mismatch() {
    let res = apply(&Value::from(json!({})), push([1]));
    assert!(matches!(
        res,
        Err(Error::TypeMismatch {
            expected: "sequence",
            found: "record"
        })
    ));
}

#[test]
fn input_is_never_modified() {
    let original = Value::from(json!({ "list": [3, 1, 2], "meta": { "n": 3 } }));
    let snapshot = serde_json::to_string(&original).unwrap();

    apply(
        &original,
        [
            prop("list", [push([4]), reverse()]),
            prop("meta", [set("n", 4), unset(["n"])]),
            merge([json!({ "list": [] })]),
        ],
    )
    .unwrap();

    assert_eq!(serde_json::to_string(&original).unwrap(), snapshot);
}
