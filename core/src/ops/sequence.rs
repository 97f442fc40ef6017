//! Sequence operators.
//!
//! All of them fail with [crate::Error::TypeMismatch] on anything but a sequence. Those that can't tell
//! in advance whether they will change anything (`splice`, `filter`, `sort`, `order_by` and
//! `reverse`) run their result through [restore_original].
use std::{cmp::Ordering, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{collect_values, expect_sequence};
use crate::{
    context::Context,
    error::Result,
    memo::restore_original,
    mutation::{chain, ElementData, IntoMutations, Mutation},
    path::check_padding,
    value::{Sequence, Value},
};

/// Clones `seq` through the context, applies `f` to the copy and returns it.
fn edit<F>(ctx: &mut Context, seq: Arc<Sequence>, f: F) -> Arc<Sequence>
where
    F: FnOnce(&mut Sequence),
{
    let mut seq = ctx.own_sequence(seq);
    f(Arc::make_mut(&mut seq));
    seq
}

fn memoized(ctx: &mut Context, seq: Arc<Sequence>) -> Value {
    restore_original(ctx, Value::Sequence(seq))
}

/// Appends `items`.
pub fn push<I>(items: I) -> Mutation
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let items = collect_values(items);

    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        if items.is_empty() {
            return Ok(Value::Sequence(seq));
        }
        Ok(Value::Sequence(edit(ctx, seq, |elts| {
            elts.extend(items.iter().cloned())
        })))
    })
}

/// Prepends `items`, keeping their order.
pub fn unshift<I>(items: I) -> Mutation
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let items = collect_values(items);

    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        if items.is_empty() {
            return Ok(Value::Sequence(seq));
        }
        if seq.is_empty() {
            return Ok(Value::Sequence(Arc::new(items.to_vec())));
        }
        Ok(Value::Sequence(edit(ctx, seq, |elts| {
            elts.splice(0..0, items.iter().cloned());
        })))
    })
}

/// Removes `delete_count` elements starting at `start` and inserts `items` in their place.
///
/// A negative `start` counts from the end. Both `start` and `delete_count` are clamped to the
/// bounds of the sequence. The removed elements are published, as a sequence, to the next
/// mutation (see [crate::result]).
pub fn splice<I>(start: i64, delete_count: usize, items: I) -> Mutation
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let items = collect_values(items);

    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        let len = seq.len();
        let from = if start < 0 {
            len.saturating_sub(usize::try_from(start.unsigned_abs()).unwrap_or(usize::MAX))
        } else {
            usize::try_from(start).unwrap_or(usize::MAX).min(len)
        };
        let to = from + delete_count.min(len - from);

        if from == to && items.is_empty() {
            return Ok(Value::Sequence(seq));
        }

        let mut removed = Vec::new();
        let seq = edit(ctx, seq, |elts| {
            removed = elts.splice(from..to, items.iter().cloned()).collect();
        });
        ctx.publish(Value::Sequence(Arc::new(removed)));
        Ok(memoized(ctx, seq))
    })
}

/// Keeps the elements for which `predicate(element, index)` holds.
pub fn filter<F>(predicate: F) -> Mutation
where
    F: Fn(&Value, usize) -> bool + Send + Sync + 'static,
{
    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        let keep: Vec<bool> = seq
            .iter()
            .enumerate()
            .map(|(idx, elt)| predicate(elt, idx))
            .collect();
        if keep.iter().all(|keep| *keep) {
            return Ok(Value::Sequence(seq));
        }

        let seq = edit(ctx, seq, |elts| {
            let mut keep = keep.iter();
            elts.retain(|_| keep.next().copied().unwrap_or(true));
        });
        Ok(memoized(ctx, seq))
    })
}

/// Stable-sorts the sequence with `compare`.
pub fn sort<F>(compare: F) -> Mutation
where
    F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
{
    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        if seq.len() < 2 {
            return Ok(Value::Sequence(seq));
        }
        let seq = edit(ctx, seq, |elts| elts.sort_by(|a, b| compare(a, b)));
        Ok(memoized(ctx, seq))
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Stable-sorts the sequence by the value `selector` picks out of each element, compared with
/// [Value::compare].
pub fn order_by<F>(selector: F, direction: Direction) -> Mutation
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    sort(move |a, b| {
        let ord = selector(a).compare(&selector(b));
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    })
}

/// Exchanges the elements at `a` and `b`. Positions past the end are padded with `Null`, within
/// the limit set by [crate::Config::max_padding].
pub fn swap(a: usize, b: usize) -> Mutation {
    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        check_padding(a.max(b), seq.len(), ctx)?;
        let unchanged = match (seq.get(a), seq.get(b)) {
            (Some(x), Some(y)) => x.identical(y),
            (Some(x), None) | (None, Some(x)) => x.is_null(),
            (None, None) => true,
        };
        if unchanged {
            return Ok(Value::Sequence(seq));
        }

        Ok(Value::Sequence(edit(ctx, seq, |elts| {
            let last = a.max(b);
            if elts.len() <= last {
                elts.resize(last + 1, Value::Null);
            }
            elts.swap(a, b);
        })))
    })
}

/// Removes the elements at the given positions. Positions out of range are ignored.
pub fn remove<I>(indices: I) -> Mutation
where
    I: IntoIterator<Item = usize>,
{
    let indices: Arc<[usize]> = indices.into_iter().collect();

    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        let mut valid: Vec<usize> = indices.iter().copied().filter(|idx| *idx < seq.len()).collect();
        if valid.is_empty() {
            return Ok(Value::Sequence(seq));
        }
        valid.sort_unstable();
        valid.dedup();

        Ok(Value::Sequence(edit(ctx, seq, |elts| {
            for idx in valid.into_iter().rev() {
                elts.remove(idx);
            }
        })))
    })
}

/// Empties the sequence.
pub fn clear() -> Mutation {
    Mutation::transform(|model, _| {
        let seq = expect_sequence(model)?;
        Ok(Value::Sequence(if seq.is_empty() {
            seq
        } else {
            Arc::default()
        }))
    })
}

/// Removes the last element and publishes it to the next mutation.
pub fn pop() -> Mutation {
    take_one(|elts| elts.pop())
}

/// Removes the first element and publishes it to the next mutation.
pub fn shift() -> Mutation {
    take_one(|elts| (!elts.is_empty()).then(|| elts.remove(0)))
}

fn take_one(f: fn(&mut Sequence) -> Option<Value>) -> Mutation {
    Mutation::transform(move |model, ctx| {
        let seq = expect_sequence(model)?;
        if seq.is_empty() {
            return Ok(Value::Sequence(seq));
        }

        let mut taken = None;
        let seq = edit(ctx, seq, |elts| taken = f(elts));
        if let Some(taken) = taken {
            ctx.publish(taken);
        }
        Ok(Value::Sequence(seq))
    })
}

/// Reverses the sequence. Reversing twice within one call gives back the original sequence.
pub fn reverse() -> Mutation {
    Mutation::transform(|model, ctx| {
        let seq = expect_sequence(model)?;
        if seq.len() < 2 {
            return Ok(Value::Sequence(seq));
        }
        let seq = edit(ctx, seq, |elts| elts.reverse());
        Ok(memoized(ctx, seq))
    })
}

/// Applies `mutations` to every element. Each run receives an [ElementData] with the position of
/// the element and the sequence as it was before mapping.
///
/// A new sequence is built only if some element changed.
///
/// A sequence that nobody else references (typically one this call already copied) is mapped in
/// place, each element being moved out while its mutations run. `sequence` then holds the
/// elements mapped so far, and `Null` at `index`.
pub fn map(mutations: impl IntoMutations) -> Mutation {
    let mutations = chain(mutations);

    Mutation::transform(move |model, ctx| {
        let mut seq = expect_sequence(model)?;
        if Arc::get_mut(&mut seq).is_some() {
            return map_in_place(ctx, seq, &mutations);
        }

        let before = Value::Sequence(Arc::clone(&seq));
        let mut rebuilt: Option<Sequence> = None;

        for (index, elt) in seq.iter().enumerate() {
            let data = ElementData {
                index,
                sequence: before.clone(),
            };
            let next = ctx.fold(elt.clone(), &mutations, Some(&data))?;

            if rebuilt.is_none() && !next.identical(elt) {
                let mut elts = Vec::with_capacity(seq.len());
                elts.extend_from_slice(&seq[..index]);
                rebuilt = Some(elts);
            }
            if let Some(elts) = rebuilt.as_mut() {
                elts.push(next);
            }
        }

        Ok(match rebuilt {
            Some(elts) => Value::Sequence(Arc::new(elts)),
            None => before,
        })
    })
}

fn map_in_place(ctx: &mut Context, mut seq: Arc<Sequence>, mutations: &[Mutation]) -> Result<Value> {
    for index in 0..seq.len() {
        let current = match Arc::get_mut(&mut seq) {
            Some(elts) => std::mem::take(&mut elts[index]),
            // A mutation kept the sequence it was handed.
            None => seq[index].clone(),
        };
        let data = ElementData {
            index,
            sequence: Value::Sequence(Arc::clone(&seq)),
        };
        let next = ctx.fold(current, mutations, Some(&data))?;
        drop(data);

        seq = ctx.own_sequence(seq);
        Arc::make_mut(&mut seq)[index] = next;
    }
    Ok(Value::Sequence(seq))
}
