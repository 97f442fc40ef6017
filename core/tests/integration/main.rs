use std::sync::{Arc, Mutex};

use sharetree_core::{Mutation, Outcome, Value};

mod channel;
mod laws;
mod scenarios;
mod sharing;
mod threads;

/// Records the distinct root containers it sees, without holding on to them.
#[derive(Clone, Default)]
pub struct NodeCounter {
    seen: Arc<Mutex<Vec<usize>>>,
}

impl NodeCounter {
    pub fn inject(&self) -> Mutation {
        let seen = Arc::clone(&self.seen);
        Mutation::new(move |model, _, _| {
            let addr = match model {
                Value::Record(rec) => Some(Arc::as_ptr(rec) as usize),
                Value::Sequence(seq) => Some(Arc::as_ptr(seq) as usize),
                _ => None,
            };
            if let Some(addr) = addr {
                let mut seen = seen.lock().unwrap();
                if !seen.contains(&addr) {
                    seen.push(addr);
                }
            }
            Ok(Outcome::Value(model.clone()))
        })
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
