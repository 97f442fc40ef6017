//! The per-call copy-on-write context.
//!
//! A [Context] lives for the duration of one [crate::apply] call. It owns:
//!
//! - the clone registry, mapping each node copied during the call back to the node it was
//!   copied from. A node that this call already copied and that nobody else references is
//!   updated in place instead of being copied again, so each node is copied at most once per
//!   call. The registry also lets the memoizer find the pre-call version of a node.
//! - the [ResultChannel] through which structural operators hand their removed elements to the
//!   next operator.
//!
//! Uniqueness is checked with [Arc::get_mut], so a node that has been shared in the meantime is
//! copied again rather than mutated: in-place updates can never leak into data someone else
//! holds.
use std::{collections::HashMap, sync::Arc};

use crate::{
    channel::ResultChannel,
    config::Config,
    error::{Error, Result},
    value::{Kind, Record, Sequence, Value},
};

#[derive(Debug, Default)]
pub struct Context {
    config: Config,
    /// Clone address to source value.
    sources: HashMap<usize, Value>,
    clones: usize,
    channel: ResultChannel,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Context {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The number of nodes copied so far.
    pub fn clone_count(&self) -> usize {
        self.clones
    }

    /// Returns a shallow copy of `value` that this call can update in place.
    ///
    /// Cloning a value that was already cloned during this call (and hasn't been shared since)
    /// returns it unchanged. If `expected` is given, the value must be of that kind.
    pub fn clone(&mut self, value: Value, expected: Option<Kind>) -> Result<Value> {
        if value.kind() == Kind::Scalar {
            return Err(Error::InvalidClone {
                found: value.type_name(),
            });
        }
        if let Some(expected) = expected.filter(|kind| *kind != value.kind()) {
            return Err(Error::kind_mismatch(expected, &value));
        }

        Ok(match value {
            Value::Record(rec) => Value::Record(self.own_record(rec)),
            Value::Sequence(seq) => Value::Sequence(self.own_sequence(seq)),
            _ => value,
        })
    }

    /// Like [Self::clone] with an expected record, but returns the node directly.
    pub(crate) fn clone_record(&mut self, value: Value) -> Result<Arc<Record>> {
        match value {
            Value::Record(rec) => Ok(self.own_record(rec)),
            other => Err(Error::mismatch("record", &other)),
        }
    }

    /// Like [Self::clone] with an expected sequence, but returns the node directly.
    pub(crate) fn clone_sequence(&mut self, value: Value) -> Result<Arc<Sequence>> {
        match value {
            Value::Sequence(seq) => Ok(self.own_sequence(seq)),
            other => Err(Error::mismatch("sequence", &other)),
        }
    }

    pub(crate) fn own_record(&mut self, rec: Arc<Record>) -> Arc<Record> {
        self.own(rec, Value::Record)
    }

    pub(crate) fn own_sequence(&mut self, seq: Arc<Sequence>) -> Arc<Sequence> {
        self.own(seq, Value::Sequence)
    }

    fn own<T: Clone>(&mut self, mut node: Arc<T>, wrap: fn(Arc<T>) -> Value) -> Arc<T> {
        if Arc::get_mut(&mut node).is_some() {
            return node;
        }

        let addr = Arc::as_ptr(&node) as *const () as usize;
        // A shared clone gets copied again, but it still descends from the same original.
        let source = match self.sources.get(&addr) {
            Some(source) => source.clone(),
            None => wrap(Arc::clone(&node)),
        };
        let copy = Arc::new(T::clone(&*node));
        self.clones += 1;
        log::trace!("copied a {} node ({} so far)", source.type_name(), self.clones);

        self.sources
            .insert(Arc::as_ptr(&copy) as *const () as usize, source);
        copy
    }

    /// The value `value` was cloned from during this call, if it is a clone.
    ///
    /// Registry entries may outlive their clone, so a fresh node could in principle be reported
    /// as the clone of an unrelated source. Callers only use the source after checking that its
    /// elements are identical to the candidate's, which makes that harmless.
    pub fn original(&self, value: &Value) -> Option<&Value> {
        value.node_addr().and_then(|addr| self.sources.get(&addr))
    }

    /// Drops the registry entry of a clone that is about to be discarded.
    pub(crate) fn forget(&mut self, value: &Value) {
        if let Some(addr) = value.node_addr() {
            self.sources.remove(&addr);
        }
    }

    /// Publishes the by-product of a structural operator for the next mutation to read.
    pub fn publish(&mut self, value: Value) {
        self.channel.publish(value);
    }

    /// Consumes the value published by the previous mutation, if any.
    pub fn take_result(&mut self) -> Option<Value> {
        self.channel.take()
    }

    pub fn peek_result(&self) -> Option<&Value> {
        self.channel.peek()
    }

    pub(crate) fn channel_mut(&mut self) -> &mut ResultChannel {
        &mut self.channel
    }
}
