//! Operators on scalars: arithmetic, booleans, strings and plain replacement.
use std::{fmt, sync::Arc};

use chrono::TimeDelta;

use super::time::Timespan;
use crate::{
    error::Error,
    mutation::Mutation,
    value::{format_number, Value},
};

/// The right-hand side of [add].
#[derive(Clone, Debug, PartialEq)]
pub enum AddOperand {
    Number(f64),
    Text(Arc<str>),
    Span(Timespan),
}

impl fmt::Display for AddOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOperand::Number(n) => write!(f, "{}", format_number(*n)),
            AddOperand::Text(s) => write!(f, "{s}"),
            AddOperand::Span(span) => write!(f, "{span}"),
        }
    }
}

macro_rules! number_operand {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AddOperand {
                fn from(n: $ty) -> Self {
                    AddOperand::Number(n as f64)
                }
            }
        )*
    };
}

number_operand!(f64, i32, i64, u32);

impl From<&str> for AddOperand {
    fn from(s: &str) -> Self {
        AddOperand::Text(s.into())
    }
}

impl From<String> for AddOperand {
    fn from(s: String) -> Self {
        AddOperand::Text(s.into())
    }
}

impl From<Timespan> for AddOperand {
    fn from(span: Timespan) -> Self {
        AddOperand::Span(span)
    }
}

/// Adds `operand` to the model:
///
/// - a string gets the text of the operand appended;
/// - a number gets a number added, a text appended (giving a string), or a [Timespan] added
///   with the number read as a millisecond timestamp;
/// - a date gets shifted by a number of milliseconds or by a [Timespan].
///
/// Adding a span or a number of milliseconds that lands on the same instant returns the model.
pub fn add(operand: impl Into<AddOperand>) -> Mutation {
    let operand = operand.into();

    Mutation::transform(move |model, _| match (&model, &operand) {
        (Value::String(s), operand) => Ok(Value::from(format!("{s}{operand}"))),
        (Value::Number(n), AddOperand::Number(m)) => Ok(Value::Number(n + m)),
        (Value::Number(n), AddOperand::Text(s)) => {
            Ok(Value::from(format!("{}{s}", format_number(*n))))
        }
        (Value::Number(n), AddOperand::Span(span)) => {
            let end = span.after_timestamp(*n)?;
            Ok(if end == *n { model } else { Value::Number(end) })
        }
        (Value::Date(date), AddOperand::Number(millis)) => {
            if !millis.is_finite() {
                return Err(Error::DateOverflow);
            }
            let delta = TimeDelta::try_milliseconds(millis.trunc() as i64);
            match delta {
                Some(delta) if delta == TimeDelta::zero() => Ok(model),
                _ => delta
                    .and_then(|delta| date.checked_add_signed(delta))
                    .map(Value::Date)
                    .ok_or(Error::DateOverflow),
            }
        }
        (Value::Date(date), AddOperand::Span(span)) => {
            let end = span.after(*date)?;
            Ok(if end == *date { model } else { Value::Date(end) })
        }
        _ => Err(Error::mismatch("number, string or date", &model)),
    })
}

fn arithmetic(operand: f64, f: fn(f64, f64) -> f64) -> Mutation {
    Mutation::transform(move |model, _| match model {
        Value::Number(n) => Ok(Value::Number(f(n, operand))),
        other => Err(Error::mismatch("number", &other)),
    })
}

/// Multiplies a number.
pub fn mul(operand: impl Into<f64>) -> Mutation {
    arithmetic(operand.into(), |n, m| n * m)
}

/// Divides a number.
pub fn div(operand: impl Into<f64>) -> Mutation {
    arithmetic(operand.into(), |n, m| n / m)
}

/// Negates the truthiness of the model, giving a boolean.
pub fn toggle() -> Mutation {
    Mutation::from_fn(|model| Value::Bool(!model.is_truthy()))
}

/// Replaces the model.
pub fn val(value: impl Into<Value>) -> Mutation {
    let value = value.into();
    Mutation::from_fn(move |_| value.clone())
}

/// Replaces the model if it is `Null`.
pub fn def(value: impl Into<Value>) -> Mutation {
    let value = value.into();
    Mutation::from_fn(move |model| if model.is_null() { value.clone() } else { model })
}

fn text(f: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Mutation {
    Mutation::transform(move |model, _| {
        let Value::String(s) = &model else {
            return Err(Error::mismatch("string", &model));
        };
        Ok(match f(s) {
            Some(next) if next != **s => Value::from(next),
            _ => model,
        })
    })
}

pub fn upper() -> Mutation {
    text(|s| Some(s.to_uppercase()))
}

pub fn lower() -> Mutation {
    text(|s| Some(s.to_lowercase()))
}

/// Replaces the first occurrence of `find`.
pub fn replace(find: impl Into<String>, with: impl Into<String>) -> Mutation {
    let find = find.into();
    let with = with.into();
    text(move |s| s.contains(find.as_str()).then(|| s.replacen(find.as_str(), &with, 1)))
}
