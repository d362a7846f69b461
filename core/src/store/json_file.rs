//! Flat JSON file scenario store: one object mapping name → snapshot.

use super::{normalize_scenario_name, ScenarioStore};
use crate::{
    error::ProjResult,
    fields::SCENARIO_FIELD,
    inputs::ProjectionInputs,
    snapshot::{ScenarioSummary, StoredSnapshot},
    types::ScenarioName,
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

type ScenarioFile = BTreeMap<ScenarioName, StoredSnapshot>;

pub struct JsonFileScenarioStore {
    path: PathBuf,
}

impl JsonFileScenarioStore {
    /// The file is created on first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ProjResult<ScenarioFile> {
        if !self.path.exists() {
            return Ok(ScenarioFile::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ScenarioFile::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a sibling temp file, then rename over the target.
    fn write_all(&self, scenarios: &ScenarioFile) -> ProjResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(scenarios)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScenarioStore for JsonFileScenarioStore {
    fn save(&self, name: &str, inputs: &ProjectionInputs) -> ProjResult<ScenarioName> {
        let name = normalize_scenario_name(name)?;
        let mut scenarios = self.read_all()?;
        scenarios.insert(name.clone(), StoredSnapshot::capture(inputs)?);
        self.write_all(&scenarios)?;

        log::info!("scenario '{name}' saved to {}", self.path.display());
        Ok(name)
    }

    fn load(&self, name: &str) -> ProjResult<Option<ProjectionInputs>> {
        let name = normalize_scenario_name(name)?;
        match self.read_all()?.remove(&name) {
            Some(snapshot) => Ok(Some(snapshot.restore()?)),
            None => Ok(None),
        }
    }

    fn list(&self) -> ProjResult<Vec<ScenarioSummary>> {
        self.read_all()?
            .into_iter()
            .map(|(name, snapshot)| -> ProjResult<ScenarioSummary> {
                // Only the selector is read; a corrupt entry still lists and
                // fails on `load`.
                let preset = serde_json::from_value(snapshot.inputs[SCENARIO_FIELD].clone())?;
                Ok(ScenarioSummary {
                    name,
                    preset,
                    saved_at: snapshot.saved_at,
                })
            })
            .collect()
    }

    fn delete(&self, name: &str) -> ProjResult<bool> {
        let name = normalize_scenario_name(name)?;
        let mut scenarios = self.read_all()?;
        let removed = scenarios.remove(&name).is_some();
        if removed {
            self.write_all(&scenarios)?;
        }
        Ok(removed)
    }
}
