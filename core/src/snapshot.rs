//! Scenario snapshot: the serialized Input Model as it is stored.
//!
//! A snapshot wraps the inputs in a versioned envelope. Loading goes
//! through `ProjectionInputs::from_value`, so a stored snapshot with a
//! missing or mistyped field fails loudly, naming the field.

use crate::{
    error::{ProjResult, ProjectionError},
    inputs::{ProjectionInputs, ScenarioPreset},
    types::ScenarioName,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub version:  u32,
    pub saved_at: String,
    pub inputs:   Value,
}

impl StoredSnapshot {
    pub fn capture(inputs: &ProjectionInputs) -> ProjResult<Self> {
        Ok(Self {
            version:  SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            inputs:   serde_json::to_value(inputs)?,
        })
    }

    pub fn restore(self) -> ProjResult<ProjectionInputs> {
        if self.version != SNAPSHOT_VERSION {
            return Err(ProjectionError::InvalidField {
                field:  "version".into(),
                reason: format!(
                    "snapshot version {} is not supported (expected {SNAPSHOT_VERSION})",
                    self.version
                ),
            });
        }
        ProjectionInputs::from_value(self.inputs)
    }
}

/// One row of `ScenarioStore::list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSummary {
    pub name:     ScenarioName,
    pub preset:   ScenarioPreset,
    pub saved_at: String,
}
