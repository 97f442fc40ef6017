//! Copy-on-write updates of tree-shaped data with structural sharing.
//!
//! A [Value] is a tree of records, sequences and scalars. [apply] runs a chain of [Mutation]s
//! over a value and returns the updated tree without modifying its input: every subtree the
//! mutations didn't touch is shared with the input, and a chain that changes nothing returns the
//! input itself. Callers can thus detect changes with [Value::identical], by comparing
//! references.
//!
//! Mutations are built from the operators of this crate ([prop], [set], [push], [merge],
//! [splice]...) or from closures ([Mutation::new]) and can be composed and reused freely.
//!
//! ```rust
//! use sharetree_core::{apply, prop, push, set, toggle, Segment, Value};
//! use serde_json::json;
//!
//! let state = Value::from(json!({
//!     "todos": [{ "id": 1, "done": false }],
//!     "filter": "all",
//! }));
//! let first = Segment::matching(|todo, _| todo.field("id") == Some(&Value::from(1)));
//!
//! let next = apply(
//!     &state,
//!     [
//!         prop(["todos".into(), first, "done".into()], toggle()),
//!         prop("todos", push([json!({ "id": 2, "done": false })])),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(next.field("todos").unwrap().at(0).unwrap().field("done"), Some(&Value::from(true)));
//! assert!(next.field("filter").unwrap().identical(state.field("filter").unwrap()));
//! assert!(apply(&next, set("filter", "all")).unwrap().identical(&next));
//! ```
pub mod channel;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
mod memo;
pub mod mutation;
pub mod ops;
pub mod path;
pub mod value;

pub use config::{Config, UnmatchedPolicy};
pub use context::Context;
pub use engine::{apply, apply_with, compose};
pub use error::{Error, Result};
pub use mutation::{ElementData, IntoMutations, Mutation, Outcome};
pub use ops::*;
pub use path::{Path, Segment};
pub use value::{Kind, Record, Sequence, Value};
