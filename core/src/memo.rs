//! Restores pre-call sequences that a permuting operator happened to leave unchanged.
//!
//! Operators such as `sort` or `filter` can't know whether they changed anything before doing
//! the work, so they always work on a clone. Once done, the clone is compared element-wise with
//! the sequence it was cloned from: if nothing moved, the original is returned instead and
//! downstream identity checks see no change.
use crate::{context::Context, value::Value};

/// Returns the value `candidate` was cloned from during this call if their elements are pairwise
/// identical, and `candidate` otherwise.
pub(crate) fn restore_original(ctx: &mut Context, candidate: Value) -> Value {
    let restored = match (ctx.original(&candidate), &candidate) {
        (Some(original @ Value::Sequence(before)), Value::Sequence(after))
            if before.len() == after.len()
                && before.iter().zip(after.iter()).all(|(a, b)| a.identical(b)) =>
        {
            Some(original.clone())
        }
        _ => None,
    };
    let Some(original) = restored else {
        return candidate;
    };

    ctx.forget(&candidate);
    log::trace!("sequence left unchanged, restoring the original");
    original
}
