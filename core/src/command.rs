use crate::{
    config::PresetCatalog,
    error::ProjResult,
    fields::SCENARIO_FIELD,
    inputs::{ProjectionInputs, ScenarioPreset},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Edits issued against the held Input Model.
/// Every edit replaces the whole record; nothing is applied partially.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum InputEdit {
    SetField { field: String, value: Value },
    ApplyPreset { preset: ScenarioPreset },
    Reset,
}

impl InputEdit {
    /// Apply to `inputs`. Setting the `scenario` selector is the same as
    /// applying that preset.
    pub fn apply(&self, inputs: &mut ProjectionInputs, catalog: &PresetCatalog) -> ProjResult<()> {
        match self {
            InputEdit::SetField { field, value } if field == SCENARIO_FIELD => {
                let preset: ScenarioPreset = serde_json::from_value(value.clone())?;
                inputs.apply_preset(catalog, preset)
            }
            InputEdit::SetField { field, value } => inputs.set_field(field, value.clone()),
            InputEdit::ApplyPreset { preset } => inputs.apply_preset(catalog, *preset),
            InputEdit::Reset => {
                *inputs = ProjectionInputs::default();
                Ok(())
            }
        }
    }
}
