//! Step domain model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single step handed to the pipeline engine
///
/// Steps are plain values: every field is known when the step is built and
/// nothing is resolved later, so two steps built from the same inputs compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Human-readable label shown by the pipeline engine
    pub label: String,

    /// Unique step key
    pub key: String,

    /// Shell command to run
    pub command: String,

    /// Agent selection (e.g. `queue: bazel`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, String>,

    /// Environment variables for the command
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Keys of the steps that must finish before this one starts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Step {
    pub fn new(key: impl Into<String>, label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            command: command.into(),
            agents: BTreeMap::new(),
            env: BTreeMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_agent(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.agents.insert(name.into(), value.into());
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Add dependency keys, ignoring ones already present
    pub fn with_dependencies<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.depends_on.contains(&key) {
                self.depends_on.push(key);
            }
        }
        self
    }

    pub fn depends_on(&self, key: &str) -> bool {
        self.depends_on.iter().any(|dep| dep == key)
    }

    /// The queue this step runs on, if any
    pub fn queue(&self) -> Option<&str> {
        self.agents.get("queue").map(String::as_str)
    }
}
