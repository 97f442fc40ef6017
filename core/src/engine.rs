//! The composition engine, folding chains of mutations over a model.
use crate::{
    config::Config,
    context::Context,
    error::Result,
    mutation::{chain, Body, ElementData, IntoMutations, Mutation, Outcome},
    value::Value,
};

/// Applies `mutations`, in order, to `model` and returns the result.
///
/// If no mutation changes anything, the returned value is identical to `model` (the same
/// allocation, for containers). Otherwise every subtree that wasn't touched is shared between
/// `model` and the result.
///
/// # Examples
///
/// ```rust
/// # use sharetree_core::{apply, prop, push, set, Value};
/// let todos = Value::from(serde_json::json!({ "ids": [1], "entities": { "1": "todo 1" } }));
/// let next = apply(
///     &todos,
///     [prop("ids", push([2])), prop("entities", set("2", "todo 2"))],
/// )
/// .unwrap();
///
/// assert_eq!(next.field("ids"), Some(&Value::from(serde_json::json!([1, 2]))));
/// assert!(apply(&next, set("ids", next.field("ids").unwrap().clone()))
///     .unwrap()
///     .identical(&next));
/// ```
pub fn apply(model: &Value, mutations: impl IntoMutations) -> Result<Value> {
    apply_with(model, mutations, &Config::default())
}

/// Same as [apply], with an explicit configuration.
pub fn apply_with(model: &Value, mutations: impl IntoMutations, config: &Config) -> Result<Value> {
    let mut ctx = Context::new(config.clone());
    let result = ctx.apply(model.clone(), mutations)?;

    log::debug!(
        "applied mutations: {} node(s) copied, root {}",
        ctx.clone_count(),
        if result.identical(model) {
            "preserved"
        } else {
            "replaced"
        }
    );
    Ok(result)
}

/// Packages a chain of mutations as a single reusable mutation.
pub fn compose(mutations: impl IntoMutations) -> Mutation {
    let chain = chain(mutations);
    Mutation::owned(move |model, data, ctx| ctx.fold(model, &chain, data))
}

impl Context {
    /// Applies a chain of mutations within this context.
    ///
    /// The model is taken by value: nodes of `model` that nobody else references may be updated
    /// in place. Keep a clone of `model` around to preserve it.
    pub fn apply(&mut self, model: Value, mutations: impl IntoMutations) -> Result<Value> {
        let mutations = mutations.into_mutations();
        self.fold(model, &mutations, None)
    }

    pub(crate) fn fold(
        &mut self,
        model: Value,
        mutations: &[Mutation],
        data: Option<&ElementData>,
    ) -> Result<Value> {
        let mut acc = model;

        for (idx, mutation) in mutations.iter().enumerate() {
            // The first mutation of a nested chain reads what its enclosing mutation could read.
            if idx > 0 {
                self.channel_mut().advance();
            }
            acc = self.run(mutation, acc, data)?;
        }

        Ok(acc)
    }

    fn run(&mut self, mutation: &Mutation, model: Value, data: Option<&ElementData>) -> Result<Value> {
        match &mutation.body {
            Body::Owned(f) => f(model, data, self),
            Body::Protocol(f) => match f(&model, data, self)? {
                Outcome::Value(value) => Ok(value),
                Outcome::Continuation(next) => self.run(&next, model, data),
                Outcome::ContinuationList(next) => self.fold(model, &next, data),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ops::*, Error};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn empty_chain_is_identity() {
        let model = Value::from(json!({ "a": 1 }));
        assert!(apply(&model, Vec::<Mutation>::new()).unwrap().identical(&model));
    }

    #[test]
    fn fold_left_to_right() {
        let model = Value::from(1);
        let next = apply(&model, [add(2), mul(10), div(5)]).unwrap();
        assert_eq!(next, Value::from(6));
    }

    #[test]
    fn continuation_applies_to_the_pre_unit_model() {
        let double_if_small = Mutation::new(|model, _, _| {
            Ok(match model.as_number() {
                Some(n) if n < 10.0 => Outcome::Continuation(mul(2)),
                _ => Outcome::Value(model.clone()),
            })
        });

        assert_eq!(apply(&Value::from(3), double_if_small.clone()).unwrap(), Value::from(6));
        assert_eq!(apply(&Value::from(30), double_if_small).unwrap(), Value::from(30));
    }

    #[test]
    fn continuation_list() {
        let unit = Mutation::new(|_, _, _| Ok(Outcome::ContinuationList(vec![push([1]), push([2])])));
        let next = apply(&Value::from(json!([0])), unit).unwrap();
        assert_eq!(next, Value::from(json!([0, 1, 2])));
    }

    #[test]
    fn errors_abort_the_call() {
        let model = Value::from(json!({ "a": [] }));
        let res = apply(&model, [prop("a", push([1])), push([2]), prop("a", push([3]))]);
        assert_matches!(
            res,
            Err(Error::TypeMismatch {
                expected: "sequence",
                found: "record"
            })
        );
    }

    #[test]
    fn compose_is_reusable() {
        let bump = compose([prop("count", add(1)), prop("touched", val(true))]);
        let model = Value::from(json!({ "count": 0 }));

        let once = apply(&model, bump.clone()).unwrap();
        let twice = apply(&once, [bump.clone(), bump]).unwrap();

        assert_eq!(once, Value::from(json!({ "count": 1, "touched": true })));
        assert_eq!(twice, Value::from(json!({ "count": 3, "touched": true })));
        assert_eq!(model, Value::from(json!({ "count": 0 })));
    }

    #[test]
    fn context_apply_reuses_the_context() {
        let mut ctx = Context::new(Config::default());
        let model = Value::from(json!([1, 2]));

        let next = ctx.apply(model.clone(), push([3])).unwrap();
        let next = ctx.apply(next, push([4])).unwrap();

        assert_eq!(next, Value::from(json!([1, 2, 3, 4])));
        assert_eq!(ctx.clone_count(), 1);
        assert_eq!(model, Value::from(json!([1, 2])));
    }
}
