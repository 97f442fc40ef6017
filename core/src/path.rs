//! Path navigation: descending into a record field or a sequence element, mutating it, and
//! rebuilding the parents on the way up.
//!
//! A path is a list of [Segment]s. `prop([a, b, c], m)` is the same as
//! `prop(a, prop(b, prop(c, m)))`. At each level the nested chain of mutations is applied to the
//! child; if the result is identical to the child, the parent is returned unchanged, otherwise
//! the parent is cloned through the [Context] and the child is replaced in the clone.
use std::{fmt, sync::Arc};

use crate::{
    config::UnmatchedPolicy,
    context::Context,
    error::{Error, Result},
    mutation::{chain, Chain, IntoMutations, Mutation},
    value::Value,
};

pub type Predicate = Arc<dyn Fn(&Value, usize) -> bool + Send + Sync>;

/// One step of a path.
#[derive(Clone)]
pub enum Segment {
    /// A record field. On a sequence, the key must be a decimal index.
    Key(String),
    /// A sequence element. On a record, it designates the field named after the index.
    Index(usize),
    /// The first element of a sequence satisfying the predicate, which receives the element and
    /// its index.
    Predicate(Predicate),
}

impl Segment {
    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&Value, usize) -> bool + Send + Sync + 'static,
    {
        Segment::Predicate(Arc::new(predicate))
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "Key({key:?})"),
            Segment::Index(idx) => write!(f, "Index({idx})"),
            Segment::Predicate(_) => write!(f, "Predicate(<fn>)"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(idx: usize) -> Self {
        Segment::Index(idx)
    }
}

/// A list of segments, outermost first.
#[derive(Clone, Debug, Default)]
pub struct Path(pub Vec<Segment>);

impl From<Segment> for Path {
    fn from(segment: Segment) -> Self {
        Path(vec![segment])
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Path(vec![key.into()])
    }
}

impl From<String> for Path {
    fn from(key: String) -> Self {
        Path(vec![key.into()])
    }
}

impl From<usize> for Path {
    fn from(idx: usize) -> Self {
        Path(vec![idx.into()])
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

impl<const N: usize> From<[Segment; N]> for Path {
    fn from(segments: [Segment; N]) -> Self {
        Path(segments.into())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Path(keys.into_iter().map(Segment::from).collect())
    }
}

/// Where a segment points to within a given container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Field(String),
    Element(usize),
}

/// Resolves a segment against a model. Returns `Ok(None)` when a predicate matches nothing and
/// the policy is to skip.
///
/// `Null` is treated as an empty record.
pub(crate) fn resolve(model: &Value, segment: &Segment, ctx: &Context) -> Result<Option<Slot>> {
    match (model, segment) {
        (Value::Record(_) | Value::Null, Segment::Key(key)) => Ok(Some(Slot::Field(key.clone()))),
        (Value::Record(_) | Value::Null, Segment::Index(idx)) => {
            Ok(Some(Slot::Field(idx.to_string())))
        }
        (Value::Sequence(elts), Segment::Index(idx)) => {
            check_padding(*idx, elts.len(), ctx)?;
            Ok(Some(Slot::Element(*idx)))
        }
        (Value::Sequence(elts), Segment::Key(key)) => {
            let idx = key.parse().map_err(|_| Error::mismatch("record", model))?;
            check_padding(idx, elts.len(), ctx)?;
            Ok(Some(Slot::Element(idx)))
        }
        (Value::Sequence(elts), Segment::Predicate(pred)) => {
            match elts.iter().enumerate().position(|(idx, elt)| pred(elt, idx)) {
                Some(idx) => Ok(Some(Slot::Element(idx))),
                None => match ctx.config().unmatched_predicate {
                    UnmatchedPolicy::Skip => {
                        log::trace!("predicate segment matched nothing, skipping");
                        Ok(None)
                    }
                    UnmatchedPolicy::Fail => Err(Error::UnmatchedPredicate { len: elts.len() }),
                },
            }
        }
        (_, Segment::Predicate(_)) => Err(Error::mismatch("sequence", model)),
        _ => Err(Error::mismatch("record", model)),
    }
}

/// Fails if writing at `index` would pad a sequence of `len` elements with more `Null`s than the
/// configuration allows.
pub(crate) fn check_padding(index: usize, len: usize, ctx: &Context) -> Result<()> {
    if index == usize::MAX || index > len.saturating_add(ctx.config().max_padding) {
        return Err(Error::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// The current content of a slot. Absent fields and elements past the end read as `Null`.
pub(crate) fn read<'a>(model: &'a Value, slot: &Slot) -> Option<&'a Value> {
    match slot {
        Slot::Field(key) => model.field(key),
        Slot::Element(idx) => model.at(*idx),
    }
}

/// Writes a slot, cloning the container through the context. Writing past the end of a sequence
/// pads it with `Null`.
pub(crate) fn write(model: Value, slot: &Slot, value: Value, ctx: &mut Context) -> Result<Value> {
    match slot {
        Slot::Field(key) => {
            let mut rec = match model {
                Value::Null => Arc::default(),
                other => ctx.clone_record(other)?,
            };
            Arc::make_mut(&mut rec).insert(key.clone(), value);
            Ok(Value::Record(rec))
        }
        Slot::Element(idx) => {
            let mut seq = ctx.clone_sequence(model)?;
            let elts = Arc::make_mut(&mut seq);
            if *idx >= elts.len() {
                elts.resize(*idx + 1, Value::Null);
            }
            elts[*idx] = value;
            Ok(Value::Sequence(seq))
        }
    }
}

/// If `model` is a container that nobody else references, moves the content of the slot out,
/// leaving `Null` behind. The flag tells whether the slot was present.
fn take_unique(model: &mut Value, slot: &Slot) -> Option<(Value, bool)> {
    match (model, slot) {
        (Value::Record(rec), Slot::Field(key)) => {
            let rec = Arc::get_mut(rec)?;
            Some(match rec.get_mut(key) {
                Some(child) => (std::mem::take(child), true),
                None => (Value::Null, false),
            })
        }
        (Value::Sequence(seq), Slot::Element(idx)) => {
            let elts = Arc::get_mut(seq)?;
            Some(match elts.get_mut(*idx) {
                Some(child) => (std::mem::take(child), true),
                None => (Value::Null, false),
            })
        }
        _ => None,
    }
}

/// Counterpart of [take_unique]. `model` must still be uniquely owned.
fn put_back(model: &mut Value, slot: &Slot, value: Value) {
    match (model, slot) {
        (Value::Record(rec), Slot::Field(key)) => {
            Arc::make_mut(rec).insert(key.clone(), value);
        }
        (Value::Sequence(seq), Slot::Element(idx)) => {
            let elts = Arc::make_mut(seq);
            if *idx >= elts.len() {
                elts.resize(*idx + 1, Value::Null);
            }
            elts[*idx] = value;
        }
        _ => (),
    }
}

fn single(segment: Segment, mutations: Chain) -> Mutation {
    Mutation::transform(move |mut model, ctx| {
        let Some(slot) = resolve(&model, &segment, ctx)? else {
            return Ok(model);
        };

        // The parent was already cloned by this call: work on the child directly, so that it
        // stays uniquely owned and can itself be updated in place.
        if let Some((child, present)) = take_unique(&mut model, &slot) {
            let next = ctx.fold(child, &mutations, None)?;
            if present || !next.is_null() {
                put_back(&mut model, &slot, next);
            }
            return Ok(model);
        }

        let current = read(&model, &slot).cloned().unwrap_or_default();
        let next = ctx.fold(current.clone(), &mutations, None)?;
        if next.identical(&current) {
            return Ok(model);
        }
        write(model, &slot, next, ctx)
    })
}

/// Applies `mutations` to the value at `path`.
///
/// Missing intermediate records are created. A predicate segment that matches nothing follows
/// [crate::config::Config::unmatched_predicate].
pub fn prop(path: impl Into<Path>, mutations: impl IntoMutations) -> Mutation {
    let Path(segments) = path.into();
    let mut nested = chain(mutations);

    for segment in segments.into_iter().rev() {
        nested = Arc::from([single(segment, nested)]);
    }

    match &*nested {
        [only] => only.clone(),
        _ => crate::engine::compose(nested.to_vec()),
    }
}
