//! Record operators: `set`, `merge` and `unset`.
use std::sync::Arc;

use indexmap::IndexMap;

use super::{collect_values, expect_record};
use crate::{
    error::{Error, Result},
    mutation::Mutation,
    path::{read, resolve, write, Segment},
    value::{Record, Value},
};

/// Writes `value` at `segment`: a record field or a sequence element, following the same rules
/// as [crate::prop].
///
/// No-op if the current value is identical to `value`. An absent field reads as `Null`, so
/// setting `Null` on an absent field is a no-op too.
pub fn set(segment: impl Into<Segment>, value: impl Into<Value>) -> Mutation {
    let segment = segment.into();
    let value = value.into();

    Mutation::transform(move |model, ctx| {
        let Some(slot) = resolve(&model, &segment, ctx)? else {
            return Ok(model);
        };
        if read(&model, &slot).unwrap_or(&Value::Null).identical(&value) {
            return Ok(model);
        }
        write(model, &slot, value.clone(), ctx)
    })
}

/// Shallow-merges the fields of each source record, in order, into the model.
///
/// A `Null` model is treated as an empty record. If the merged fields end up identical to the
/// ones the model had (including when a later source restores what an earlier one changed), the
/// model is returned unchanged.
pub fn merge<I>(sources: I) -> Mutation
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let sources = collect_values(sources);

    Mutation::transform(move |model, ctx| {
        let records = sources
            .iter()
            .map(|src| src.as_record().ok_or_else(|| Error::mismatch("record", src)))
            .collect::<Result<Vec<&Record>>>()?;

        let mut node = match model {
            Value::Null => None,
            other => Some(expect_record(other)?),
        };
        // Kept to return when the merge cancels out. A uniquely owned node is edited in place
        // and can't be snapshotted without being shared.
        let snapshot = match node.as_mut() {
            Some(rec) => Arc::get_mut(rec).is_none().then(|| Arc::clone(rec)),
            None => None,
        };
        let mut owned = false;
        // Changed key to the value it had before the merge.
        let mut changed: IndexMap<String, Option<Value>> = IndexMap::new();

        for (key, value) in records.iter().flat_map(|rec| rec.iter()) {
            let current = node.as_deref().and_then(|rec| rec.get(key));
            if current.is_some_and(|current| current.identical(value)) {
                continue;
            }

            if !owned {
                node = node.map(|rec| ctx.own_record(rec));
                owned = true;
            }
            let fields = Arc::make_mut(node.get_or_insert_with(Arc::default));
            let old = fields.insert(key.clone(), value.clone());
            changed.entry(key.clone()).or_insert(old);
        }

        let Some(node) = node else {
            return Ok(Value::Null);
        };
        let net_change = changed.iter().any(|(key, old)| {
            match (old, node.get(key)) {
                (Some(old), Some(new)) => !old.identical(new),
                (None, None) => false,
                _ => true,
            }
        });

        match snapshot {
            Some(snapshot) if !net_change => {
                let discarded = Value::Record(node);
                ctx.forget(&discarded);
                Ok(Value::Record(snapshot))
            }
            _ => Ok(Value::Record(node)),
        }
    })
}

/// Deletes the given fields. The record is cloned on the first field actually present.
///
/// `Null` is left as is.
pub fn unset<I>(keys: I) -> Mutation
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let keys: Arc<[String]> = keys.into_iter().map(Into::into).collect();

    Mutation::transform(move |model, ctx| {
        if model.is_null() {
            return Ok(model);
        }

        let mut rec = expect_record(model)?;
        for key in keys.iter() {
            if rec.contains_key(key.as_str()) {
                rec = ctx.own_record(rec);
                Arc::make_mut(&mut rec).shift_remove(key.as_str());
            }
        }
        Ok(Value::Record(rec))
    })
}
