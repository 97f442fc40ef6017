//! The operator library.
//!
//! Every operator is a factory returning a reusable [crate::Mutation]. Operators never modify a
//! node they didn't obtain from the [crate::Context], and return their input unchanged (the same
//! allocation) when they have nothing to do.
use std::sync::Arc;

use crate::{
    error::{Error, Result},
    value::{Record, Sequence, Value},
};

mod record;
mod result;
mod scalar;
mod sequence;
mod time;

pub use crate::path::prop;
pub use record::{merge, set, unset};
pub use result::result;
pub use scalar::{add, def, div, lower, mul, replace, toggle, upper, val, AddOperand};
pub use sequence::{
    clear, filter, map, order_by, pop, push, remove, reverse, shift, sort, splice, swap, unshift,
    Direction,
};
pub use time::Timespan;

pub(crate) fn expect_sequence(model: Value) -> Result<Arc<Sequence>> {
    match model {
        Value::Sequence(seq) => Ok(seq),
        other => Err(Error::mismatch("sequence", &other)),
    }
}

pub(crate) fn expect_record(model: Value) -> Result<Arc<Record>> {
    match model {
        Value::Record(rec) => Ok(rec),
        other => Err(Error::mismatch("record", &other)),
    }
}

/// Collects operator arguments once, so that the mutation can be applied many times.
pub(crate) fn collect_values<I>(items: I) -> Arc<[Value]>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    items.into_iter().map(Into::into).collect()
}
