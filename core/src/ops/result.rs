use crate::{mutation::Mutation, value::Value};

/// Reads what the previous mutation published (the elements removed by `splice`, the element
/// removed by `pop` or `shift`) and lets `f` decide what to do with it.
///
/// `f` receives the published value, if any, and the current model. The mutations it returns
/// are applied to the model; returning `None` leaves the model unchanged. The published value
/// is consumed either way.
pub fn result<F>(f: F) -> Mutation
where
    F: Fn(Option<&Value>, &Value) -> Option<Vec<Mutation>> + Send + Sync + 'static,
{
    Mutation::owned(move |model, data, ctx| {
        let published = ctx.take_result();
        match f(published.as_ref(), &model) {
            Some(next) => ctx.fold(model, &next, data),
            None => Ok(model),
        }
    })
}
