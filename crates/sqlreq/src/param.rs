//! Named bind parameters and the shared deduplication fold.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A named, nullable bind value associated with an `@name` placeholder in
/// rendered SQL text.
///
/// Identity for deduplication purposes is the name alone, case-sensitive;
/// the value is opaque payload forwarded to the execution layer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    name: String,
    value: Value,
}

impl Param {
    /// Create a new named parameter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The parameter name, without the `@` sigil.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Reduce a parameter sequence to one entry per distinct name.
///
/// The value of the **last** occurrence of a name wins, but the entry stays at
/// the position where the name **first** appeared. Both halves of the rule
/// matter: the value determines what is bound, the position keeps ordering
/// deterministic for positional backends.
pub fn dedupe_by_name(params: Vec<Param>) -> Vec<Param> {
    let mut seen: IndexMap<String, Value> = IndexMap::with_capacity(params.len());
    for param in params {
        seen.insert(param.name, param.value);
    }
    seen.into_iter()
        .map(|(name, value)| Param { name, value })
        .collect()
}
