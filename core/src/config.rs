//! Configuration of a mutation call.
use serde::{Deserialize, Serialize};

/// What to do when a predicate path segment doesn't match any element of the sequence it
/// searches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Leave the sequence untouched and don't run the nested mutations.
    #[default]
    Skip,
    /// Abort the call with [crate::Error::UnmatchedPredicate].
    Fail,
}

/// Options shared by all the mutations run within a single [crate::apply_with] call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Policy for predicate segments that match nothing
    pub unmatched_predicate: UnmatchedPolicy,
    /// How many `Null` elements a write past the end of a sequence may add. Writing further
    /// fails with [crate::Error::IndexOutOfRange].
    pub max_padding: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            unmatched_predicate: UnmatchedPolicy::default(),
            max_padding: 1024,
        }
    }
}

impl Config {
    /// Parses a configuration from TOML. Missing keys take their default value.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
