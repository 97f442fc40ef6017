//! The single-slot side channel between a structural operator and the operator right after it.
//!
//! `splice`, `pop` and `shift` publish what they removed. The engine [advances](ResultChannel::advance)
//! the channel before running each mutation of a chain except the first one, so a published
//! value is readable by exactly the next mutation. The first mutation of a nested chain sees
//! whatever its enclosing mutation saw.
use crate::value::Value;

#[derive(Debug, Default)]
pub struct ResultChannel {
    published: Option<Value>,
    readable: Option<Value>,
}

impl ResultChannel {
    pub fn publish(&mut self, value: Value) {
        self.published = Some(value);
    }

    /// Makes the last published value readable, discarding whatever was readable before.
    pub(crate) fn advance(&mut self) {
        self.readable = self.published.take();
    }

    pub fn peek(&self) -> Option<&Value> {
        self.readable.as_ref()
    }

    /// Consumes the readable value.
    pub fn take(&mut self) -> Option<Value> {
        self.readable.take()
    }
}
