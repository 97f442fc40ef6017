//! Errors raised while applying mutations.
//!
//! Errors are not recovered from: the first failing mutation aborts the whole [crate::apply]
//! call and no partial result is produced.
use crate::value::{Kind, Value};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operator received a value of a shape it cannot work with, e.g. `push` on a record.
    #[error("expected a {expected}, got a {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Only records and sequences can be cloned.
    #[error("cannot clone a {found}: only records and sequences can be cloned")]
    InvalidClone { found: &'static str },

    /// A predicate path segment didn't match any element, and the configuration asks for this
    /// to be an error. See [crate::config::UnmatchedPolicy].
    #[error("no element matched the predicate (searched {len} elements)")]
    UnmatchedPredicate { len: usize },

    /// A write targeted a position too far past the end of a sequence. See
    /// [crate::config::Config::max_padding].
    #[error("index {index} is too far past the end of a sequence of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    /// Calendar arithmetic went out of the representable range of dates.
    #[error("date arithmetic overflowed")]
    DateOverflow,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
        Error::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }

    pub(crate) fn kind_mismatch(expected: Kind, found: &Value) -> Self {
        let expected = match expected {
            Kind::Record => "record",
            Kind::Sequence => "sequence",
            Kind::Scalar => "scalar",
        };
        Error::mismatch(expected, found)
    }
}
