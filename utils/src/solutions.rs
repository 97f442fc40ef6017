//! Competing ways of maintaining the todo state across writes.
//!
//! All of them keep every intermediate state valid: a state returned by [Solution::read] is never
//! modified by a later write.
use std::sync::Arc;

use sharetree_core::{apply, prop, push, val, Mutation, Path, Segment, Value};

use crate::fixture::{empty_state, Todo};

pub trait Solution {
    const NAME: &'static str;

    /// Starts from `base`, which must have the shape of [empty_state].
    fn init(base: &Value) -> Self;

    fn write(&mut self, batch: &[Todo]);

    fn read(&self) -> Value;
}

/// One [apply] call per batch, pushing the ids and setting each entity by path.
pub struct Engine {
    state: Value,
}

impl Engine {
    pub fn mutations(batch: &[Todo]) -> Vec<Mutation> {
        let mut mutations = Vec::with_capacity(batch.len() + 1);
        mutations.push(prop("ids", push(batch.iter().map(|todo| todo.id))));
        mutations.extend(batch.iter().map(|todo| {
            let path = Path::from(vec![Segment::from("entities"), Segment::from(todo.key())]);
            prop(path, val(todo))
        }));
        mutations
    }
}

impl Solution for Engine {
    const NAME: &'static str = "engine";

    fn init(base: &Value) -> Self {
        Engine {
            state: base.clone(),
        }
    }

    fn write(&mut self, batch: &[Todo]) {
        match apply(&self.state, Engine::mutations(batch)) {
            Ok(next) => self.state = next,
            Err(err) => panic!("writing a batch of todos failed: {err}"),
        }
    }

    fn read(&self) -> Value {
        self.state.clone()
    }
}

/// Copies the whole tree before every write, then edits the copy.
pub struct DeepCopy {
    state: Value,
}

fn deep_copy(value: &Value) -> Value {
    match value {
        Value::Record(rec) => Value::Record(Arc::new(
            rec.iter().map(|(k, v)| (k.clone(), deep_copy(v))).collect(),
        )),
        Value::Sequence(seq) => Value::Sequence(Arc::new(seq.iter().map(deep_copy).collect())),
        scalar => scalar.clone(),
    }
}

impl Solution for DeepCopy {
    const NAME: &'static str = "deep copy";

    fn init(base: &Value) -> Self {
        DeepCopy {
            state: deep_copy(base),
        }
    }

    fn write(&mut self, batch: &[Todo]) {
        let mut next = deep_copy(&self.state);
        if let Value::Record(root) = &mut next {
            let root = Arc::make_mut(root);
            if let Some(Value::Sequence(ids)) = root.get_mut("ids") {
                Arc::make_mut(ids).extend(batch.iter().map(|todo| Value::from(todo.id)));
            }
            if let Some(Value::Record(entities)) = root.get_mut("entities") {
                Arc::make_mut(entities)
                    .extend(batch.iter().map(|todo| (todo.key(), Value::from(todo))));
            }
        }
        self.state = next;
    }

    fn read(&self) -> Value {
        self.state.clone()
    }
}

/// Persistent collections from `rpds`. Reading materialises a [Value].
pub struct Persistent {
    ids: rpds::Vector<u64>,
    entities: rpds::HashTrieMap<u64, Value>,
}

impl Solution for Persistent {
    const NAME: &'static str = "rpds";

    fn init(base: &Value) -> Self {
        let ids: rpds::Vector<u64> = base
            .field("ids")
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten()
            .filter_map(|id| id.as_number().map(|id| id as u64))
            .collect();
        let entities = ids
            .iter()
            .filter_map(|id| {
                let entity = base.field("entities")?.field(&id.to_string())?;
                Some((*id, entity.clone()))
            })
            .collect();

        Persistent { ids, entities }
    }

    fn write(&mut self, batch: &[Todo]) {
        for todo in batch {
            self.ids = self.ids.push_back(todo.id);
            self.entities = self.entities.insert(todo.id, todo.into());
        }
    }

    fn read(&self) -> Value {
        let ids = Value::sequence(self.ids.iter().copied());
        let entities = Value::record(self.ids.iter().filter_map(|id| {
            self.entities
                .get(id)
                .map(|entity| (id.to_string(), entity.clone()))
        }));
        Value::record([("ids", ids), ("entities", entities)])
    }
}

/// Initialises `S` from the empty state and writes all `batches`.
pub fn run<S: Solution>(batches: &[Vec<Todo>]) -> S {
    let mut solution = S::init(&empty_state());
    for batch in batches {
        solution.write(batch);
    }
    solution
}
