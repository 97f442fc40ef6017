//! Mutation units and what they return.
use std::{fmt, sync::Arc};

use crate::{context::Context, error::Result, value::Value};

/// Auxiliary data handed to each mutation run by [crate::map].
#[derive(Clone, Debug)]
pub struct ElementData {
    /// Position of the element being mutated
    pub index: usize,
    /// The sequence the element belongs to, as it was before mapping
    pub sequence: Value,
}

/// What a mutation built with [Mutation::new] returns.
pub enum Outcome {
    /// The new model.
    Value(Value),
    /// A mutation to apply to the model the unit received, whose result becomes the new model.
    Continuation(Mutation),
    /// Same as [Outcome::Continuation], for a chain of mutations.
    ContinuationList(Vec<Mutation>),
}

type OwnedFn = dyn Fn(Value, Option<&ElementData>, &mut Context) -> Result<Value> + Send + Sync;
type ProtocolFn =
    dyn Fn(&Value, Option<&ElementData>, &mut Context) -> Result<Outcome> + Send + Sync;

#[derive(Clone)]
pub(crate) enum Body {
    /// Takes the model by value and returns the new model. Uniquely owned nodes of the model
    /// can be updated in place. All the built-in operators are of this kind.
    Owned(Arc<OwnedFn>),
    /// Borrows the model and returns an [Outcome]. The engine keeps the model around so that
    /// a continuation can be applied to it.
    Protocol(Arc<ProtocolFn>),
}

/// A reusable description of a transformation.
///
/// Mutations hold no per-call state: the same value can be applied any number of times, from
/// any number of threads.
#[derive(Clone)]
pub struct Mutation {
    pub(crate) body: Body,
}

impl Mutation {
    /// Creates a mutation following the full calling convention: it receives the current model,
    /// the auxiliary data of [crate::map] if any, and the context of the call, and returns
    /// either a new model or a continuation.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, Option<&ElementData>, &mut Context) -> Result<Outcome>
            + Send
            + Sync
            + 'static,
    {
        Mutation {
            body: Body::Protocol(Arc::new(f)),
        }
    }

    /// Creates a mutation that takes the model by value. Nodes obtained through
    /// [Context::clone] can then be updated in place.
    pub fn transform<F>(f: F) -> Self
    where
        F: Fn(Value, &mut Context) -> Result<Value> + Send + Sync + 'static,
    {
        Mutation::owned(move |model, _, ctx| f(model, ctx))
    }

    /// Creates a mutation from a plain function of the model.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Mutation::owned(move |model, _, _| Ok(f(model)))
    }

    pub(crate) fn owned<F>(f: F) -> Self
    where
        F: Fn(Value, Option<&ElementData>, &mut Context) -> Result<Value> + Send + Sync + 'static,
    {
        Mutation {
            body: Body::Owned(Arc::new(f)),
        }
    }
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.body {
            Body::Owned(_) => write!(f, "Mutation(<owned>)"),
            Body::Protocol(_) => write!(f, "Mutation(<protocol>)"),
        }
    }
}

/// Anything that can be turned into an ordered chain of mutations: a single mutation, a vector,
/// an array or a slice of them.
pub trait IntoMutations {
    fn into_mutations(self) -> Vec<Mutation>;
}

impl IntoMutations for Mutation {
    fn into_mutations(self) -> Vec<Mutation> {
        vec![self]
    }
}

impl IntoMutations for Vec<Mutation> {
    fn into_mutations(self) -> Vec<Mutation> {
        self
    }
}

impl<const N: usize> IntoMutations for [Mutation; N] {
    fn into_mutations(self) -> Vec<Mutation> {
        self.into()
    }
}

impl IntoMutations for &[Mutation] {
    fn into_mutations(self) -> Vec<Mutation> {
        self.to_vec()
    }
}

impl IntoMutations for &Vec<Mutation> {
    fn into_mutations(self) -> Vec<Mutation> {
        self.clone()
    }
}

/// A chain of mutations shared by the combinators that nest one.
pub(crate) type Chain = Arc<[Mutation]>;

pub(crate) fn chain(mutations: impl IntoMutations) -> Chain {
    mutations.into_mutations().into()
}
