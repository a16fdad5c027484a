//! Pipeline domain model

use crate::core::step::Step;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named group of steps, rendered as a pipeline group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSet {
    /// Group name
    #[serde(rename = "group")]
    pub name: String,

    /// Steps in emission order
    pub steps: Vec<Step>,
}

impl StepSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn extend(&mut self, steps: impl IntoIterator<Item = Step>) {
        self.steps.extend(steps);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// An ordered pipeline, ready to hand to the pipeline engine
///
/// Steps only ever depend on steps emitted before them, so the dependency
/// graph is acyclic as built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Step groups in emission order
    #[serde(rename = "steps")]
    pub groups: Vec<StepSet>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group of steps; empty groups are dropped
    pub fn push_set(&mut self, set: StepSet) {
        if !set.is_empty() {
            self.groups.push(set);
        }
    }

    /// All steps across every group, in emission order
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.groups.iter().flat_map(|set| set.steps.iter())
    }

    /// Get a step by key
    pub fn step(&self, key: &str) -> Option<&Step> {
        self.steps().find(|s| s.key == key)
    }

    /// Step keys in emission order
    pub fn keys(&self) -> Vec<&str> {
        self.steps().map(|s| s.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(StepSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dependency edges as `(dependency, dependent)` pairs
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.steps()
            .flat_map(|step| {
                step.depends_on
                    .iter()
                    .map(move |dep| (dep.as_str(), step.key.as_str()))
            })
            .collect()
    }

    /// Check that step keys are unique and every dependency names a step
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for step in self.steps() {
            if !seen.insert(step.key.as_str()) {
                anyhow::bail!("Duplicate step key: {}", step.key);
            }
        }

        for step in self.steps() {
            for dep in &step.depends_on {
                if !seen.contains(dep.as_str()) {
                    anyhow::bail!(
                        "Step '{}' depends on non-existent step '{}'",
                        step.key,
                        dep
                    );
                }
            }
        }

        Ok(())
    }

    /// Render the pipeline as a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render the pipeline as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
