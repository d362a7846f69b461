//! Scenario persistence.
//!
//! RULE: the projection engine never touches a store. Stores only save
//! and load Input Model snapshots by name.

mod json_file;
mod sqlite;

pub use json_file::JsonFileScenarioStore;
pub use sqlite::SqliteScenarioStore;

use crate::{
    error::{ProjResult, ProjectionError},
    inputs::ProjectionInputs,
    snapshot::ScenarioSummary,
    types::ScenarioName,
};

pub trait ScenarioStore {
    /// Save (or overwrite) `inputs` under the normalized form of `name`.
    /// Returns the normalized name.
    fn save(&self, name: &str, inputs: &ProjectionInputs) -> ProjResult<ScenarioName>;

    /// `Ok(None)` when no scenario has that name.
    fn load(&self, name: &str) -> ProjResult<Option<ProjectionInputs>>;

    /// All saved scenarios, ordered by name.
    fn list(&self) -> ProjResult<Vec<ScenarioSummary>>;

    /// Returns true if a scenario was removed.
    fn delete(&self, name: &str) -> ProjResult<bool>;
}

/// Trim, lowercase, and join whitespace-separated words with hyphens.
/// "Lean Launch  Q3" → "lean-launch-q3".
pub fn normalize_scenario_name(name: &str) -> ProjResult<ScenarioName> {
    let normalized = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if normalized.is_empty() {
        return Err(ProjectionError::InvalidScenarioName { name: name.to_string() });
    }
    Ok(normalized)
}
