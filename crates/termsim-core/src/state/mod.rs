//! Environment state domain module.
//!
//! The environment is an open-ended JSON object describing the simulated
//! cluster and repository. No schema is enforced: collaborators may introduce
//! new keys at any time, and the merge engine works on the generic tree.
//!
//! # Module Structure
//!
//! - `merge`: recursive structural merge of update documents
//! - `defaults`: the baseline environment for new and reset sessions
//! - `outcome`: `StateUpdateOutcome` and `UnchangedReason`

mod defaults;
pub mod merge;
mod outcome;

pub use defaults::default_environment;
pub use outcome::{StateUpdateOutcome, UnchangedReason};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// The simulated world a session observes and mutates.
///
/// Always a JSON object at the root, so it stays serializable and mergeable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentState(Map<String, Value>);

impl EnvironmentState {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns a new state with `updates` merged on top of this one.
    pub fn merged(&self, updates: &Map<String, Value>) -> Self {
        Self(merge::merge(&self.0, updates))
    }

    /// Pretty-printed JSON (two-space indent) handed to collaborators.
    pub fn to_canonical_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }
}

impl From<Map<String, Value>> for EnvironmentState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
