//! The todo-list workload the solutions are compared on.
//!
//! The state is a normalised collection: `{ ids: [..], entities: { "<id>": todo } }`. Each write
//! appends a batch of new todos to both.
use sharetree_core::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
}

impl Todo {
    pub fn new(id: u64) -> Self {
        Todo {
            id,
            title: format!("Todo {id}"),
        }
    }

    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

impl From<&Todo> for Value {
    fn from(todo: &Todo) -> Self {
        Value::record([
            ("id", Value::from(todo.id)),
            ("title", Value::from(todo.title.as_str())),
        ])
    }
}

/// `{ ids: [], entities: {} }`
pub fn empty_state() -> Value {
    Value::record([
        ("ids", Value::sequence(Vec::<Value>::new())),
        ("entities", Value::record(Vec::<(String, Value)>::new())),
    ])
}

/// `batches` consecutive batches of `batch_size` todos, with ids counting up from 0.
pub fn batches(batches: usize, batch_size: usize) -> Vec<Vec<Todo>> {
    (0..batches)
        .map(|batch| {
            let start = (batch * batch_size) as u64;
            (start..start + batch_size as u64).map(Todo::new).collect()
        })
        .collect()
}

/// Checks that `state` holds exactly the todos `0..count`, in order.
pub fn verify(state: &Value, count: usize) -> Result<(), String> {
    let ids = state
        .field("ids")
        .and_then(Value::as_sequence)
        .ok_or("missing `ids` sequence")?;
    let entities = state
        .field("entities")
        .and_then(Value::as_record)
        .ok_or("missing `entities` record")?;

    if ids.len() != count || entities.len() != count {
        return Err(format!(
            "expected {count} todos, got {} ids and {} entities",
            ids.len(),
            entities.len()
        ));
    }

    for (idx, id) in ids.iter().enumerate() {
        let todo = Todo::new(idx as u64);
        if id != &Value::from(todo.id) {
            return Err(format!("expected id {} at position {idx}, got {id}", todo.id));
        }
        match entities.get(&todo.key()) {
            Some(entity) if *entity == Value::from(&todo) => (),
            Some(entity) => return Err(format!("unexpected entity for {}: {entity}", todo.id)),
            None => return Err(format!("missing entity for {}", todo.id)),
        }
    }
    Ok(())
}
