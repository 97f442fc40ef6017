use pretty_assertions::assert_eq;
use serde_json::json;
use sharetree_core::{apply, map, pop, prop, push, result, set, shift, val, Value};

#[test]
fn publication_is_visible_to_the_next_unit_only() {
    let model = Value::from(json!({ "queue": [1, 2], "log": [] }));
    let next = apply(
        &model,
        [
            prop("queue", shift()),
            prop("log", result(|first, _| Some(vec![push([first?.clone()])]))),
            prop("log", result(|again, _| again.map(|again| vec![push([again.clone()])]))),
        ],
    )
    .unwrap();

    assert_eq!(next, Value::from(json!({ "queue": [2], "log": [1] })));
}

#[test]
fn moving_an_element_between_sequences() {
    let model = Value::from(json!({ "todo": ["a", "b"], "done": ["c"] }));
    let next = apply(
        &model,
        [
            prop("todo", pop()),
            prop("done", result(|popped, _| Some(vec![push([popped?.clone()])]))),
        ],
    )
    .unwrap();

    assert_eq!(next, Value::from(json!({ "todo": ["a"], "done": ["c", "b"] })));
    assert!(model.field("done").unwrap().as_sequence().unwrap().len() == 1);
}

#[test]
fn element_data_within_map() {
    let model = Value::from(json!([{ "v": 1 }, { "v": 2 }]));
    let next = apply(
        &model,
        map(sharetree_core::Mutation::new(|_, data, _| {
            let data = data.cloned();
            Ok(sharetree_core::Outcome::ContinuationList(vec![
                set("index", data.as_ref().map_or(-1, |d| d.index as i64)),
                set(
                    "of",
                    data.map_or(0, |d| d.sequence.as_sequence().map_or(0, Vec::len)),
                ),
            ]))
        })),
    )
    .unwrap();

    assert_eq!(
        next,
        Value::from(json!([
            { "v": 1, "index": 0, "of": 2 },
            { "v": 2, "index": 1, "of": 2 },
        ]))
    );
}

#[test]
fn nothing_published_reads_none() {
    let model = Value::from(json!([1]));
    let next = apply(
        &model,
        [
            push([2]),
            result(|published, _| published.is_none().then(|| vec![val(json!("empty"))])),
        ],
    )
    .unwrap();
    assert_eq!(next, Value::from("empty"));
}
