//! The tree-shaped data that mutations operate on.
//!
//! A [Value] is either a scalar (null, boolean, number, string, date) or a container (record or
//! sequence). Containers live behind an [Arc] so that unchanged subtrees can be shared between
//! an old tree and a new one. Two notions of equality coexist:
//!
//! - [PartialEq] is deep, structural equality. It is what tests usually want.
//! - [Value::identical] is reference identity for containers and value equality for scalars,
//!   which is what change detection downstream relies on. A mutation that doesn't change
//!   anything must return a value identical to its input.
use std::{cmp::Ordering, fmt, sync::Arc};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Serialize,
};

/// The fields of a record, in insertion order.
pub type Record = IndexMap<String, Value>;

/// The elements of a sequence.
pub type Sequence = Vec<Value>;

/// The closed set of value kinds that operators discriminate on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Record,
    Sequence,
    Scalar,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Record => write!(f, "record"),
            Kind::Sequence => write!(f, "sequence"),
            Kind::Scalar => write!(f, "scalar"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The absent value. Missing fields read as `Null`.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
    Date(NaiveDateTime),
    Record(Arc<Record>),
    Sequence(Arc<Sequence>),
}

impl Value {
    /// Creates a record out of `(key, value)` pairs.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(Arc::new(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Creates a sequence out of anything convertible to values.
    pub fn sequence<V, I>(elements: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Sequence(Arc::new(elements.into_iter().map(Into::into).collect()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Record(_) => Kind::Record,
            Value::Sequence(_) => Kind::Sequence,
            _ => Kind::Scalar,
        }
    }

    /// A short, human-readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Record(_) => "record",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Reference identity for containers, value equality for scalars.
    ///
    /// `NaN` is never identical to itself, and dates are compared by instant.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Sequence(a), Value::Sequence(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The address of the allocation backing a container, if any.
    pub(crate) fn node_addr(&self) -> Option<usize> {
        match self {
            Value::Record(rec) => Some(Arc::as_ptr(rec) as *const () as usize),
            Value::Sequence(seq) => Some(Arc::as_ptr(seq) as *const () as usize),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness: `null`, `false`, `0`, `NaN` and the empty string are falsy, everything else
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Date(_) | Value::Record(_) | Value::Sequence(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Looks up a field of a record. Returns `None` for anything else.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.as_record().and_then(|rec| rec.get(key))
    }

    /// Looks up an element of a sequence. Returns `None` for anything else.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_sequence().and_then(|seq| seq.get(index))
    }

    /// The total order used for sorting by selected keys: numbers numerically, strings
    /// lexically, dates chronologically and `false < true`. Values of different types are ordered
    /// by type (booleans, numbers, strings, dates, then everything else). `Null` and containers
    /// are all equal, so that a stable sort leaves them in place.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => self.sort_rank().cmp(&other.sort_rank()),
        }
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Date(_) => 3,
            Value::Null | Value::Record(_) | Value::Sequence(_) => 4,
        }
    }
}

/// Formats a number the way it reads in text: integral values have no fractional part.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else {
        n.to_string()
    }
}

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Record(_) | Value::Sequence(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{json}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            Value::Record(rec) => {
                let mut map = serializer.serialize_map(Some(rec.len()))?;
                for (key, value) in rec.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Sequence(elts) => {
                let mut seq = serializer.serialize_seq(Some(elts.len()))?;
                for elt in elts.iter() {
                    seq.serialize_element(elt)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(elts) => Value::sequence(elts),
            serde_json::Value::Object(fields) => Value::record(fields),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<Record> for Value {
    fn from(rec: Record) -> Self {
        Value::Record(Arc::new(rec))
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(Arc::new(seq))
    }
}
