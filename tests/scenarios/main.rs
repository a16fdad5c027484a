//! Scenario-based tests for wolfi-ci

#[path = "../helpers.rs"]
mod helpers;

mod classification;
mod dependency_lookup;
