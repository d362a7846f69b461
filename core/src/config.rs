//! Preset catalog: named partial Input Model bundles.
//!
//! Built-in bundles ship with the crate. A data directory may override
//! them through `presets/scenario_presets.json`.

use crate::{
    error::{ProjResult, ProjectionError},
    fields::{field_spec, SCENARIO_FIELD},
    inputs::ScenarioPreset,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Field name → new value. Fields absent from a bundle keep their value.
pub type PresetBundle = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct PresetCatalog {
    presets: HashMap<ScenarioPreset, PresetBundle>,
}

#[derive(Debug, Clone, Deserialize)]
struct PresetCatalogFile {
    presets: HashMap<String, PresetBundle>,
}

impl PresetCatalog {
    /// Load from the data/ directory.
    /// In tests, use PresetCatalog::builtin().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/presets/scenario_presets.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: PresetCatalogFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let mut presets = HashMap::new();
        for (key, bundle) in file.presets {
            let preset = ScenarioPreset::from_key(&key)
                .map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
            check_bundle(preset, &bundle).map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
            presets.insert(preset, bundle);
        }

        log::info!("loaded {} scenario presets from {path}", presets.len());
        Ok(Self { presets })
    }

    /// Load from `data_dir`, falling back to the built-in bundles.
    pub fn load_or_builtin(data_dir: &str) -> Self {
        match Self::load(data_dir) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("using built-in presets: {e}");
                Self::builtin()
            }
        }
    }

    pub fn get_preset(&self, preset: ScenarioPreset) -> ProjResult<&PresetBundle> {
        self.presets
            .get(&preset)
            .ok_or_else(|| ProjectionError::UnknownPreset { key: preset.key().to_string() })
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn builtin() -> Self {
        let lean = json!({
            "founding_physician": true,
            "additional_physicians": 0,
            "primary_carryover_per_physician": 15.0,
            "specialty_carryover_per_physician": 25.0,
            "primary_intake_per_physician": 2.0,
            "specialty_intake_per_physician": 1.0,
            "primary_churn_annual_pct": 5.0,
            "specialty_churn_annual_pct": 5.0,
            "growth_curve": "linear",
            "primary_price": 450.0,
            "specialty_price": 450.0,
            "corporate_enabled": false,
            "diagnostics_enabled": false,
            "fixed_overhead_monthly": 50_000.0,
            "marketing_monthly": 25_000.0,
            "medical_assistant_count": 2,
            "nurse_count": 1,
            "admin_count": 1,
            "equipment_lease_monthly": 0.0,
        });

        let conservative = json!({
            "founding_physician": true,
            "additional_physicians": 1,
            "primary_carryover_per_physician": 20.0,
            "specialty_carryover_per_physician": 30.0,
            "primary_intake_per_physician": 4.0,
            "specialty_intake_per_physician": 3.0,
            "primary_churn_annual_pct": 8.0,
            "specialty_churn_annual_pct": 10.0,
            "growth_curve": "s_curve",
            "primary_price": 450.0,
            "specialty_price": 450.0,
            "corporate_enabled": false,
            "diagnostics_enabled": true,
            "diagnostics_start_month": 9,
            "fixed_overhead_monthly": 50_000.0,
            "marketing_monthly": 20_000.0,
            "medical_assistant_count": 3,
            "nurse_count": 1,
            "admin_count": 2,
            "equipment_lease_monthly": 6_500.0,
        });

        let moderate = json!({
            "founding_physician": true,
            "additional_physicians": 3,
            "primary_carryover_per_physician": 20.0,
            "specialty_carryover_per_physician": 30.0,
            "primary_intake_per_physician": 8.0,
            "specialty_intake_per_physician": 5.0,
            "primary_churn_annual_pct": 6.0,
            "specialty_churn_annual_pct": 8.0,
            "growth_curve": "s_curve",
            "primary_price": 500.0,
            "specialty_price": 475.0,
            "corporate_enabled": true,
            "corporate_start_month": 9,
            "corporate_contracts_per_month": 2.0,
            "employees_per_contract": 40.0,
            "diagnostics_enabled": true,
            "diagnostics_start_month": 6,
            "fixed_overhead_monthly": 65_000.0,
            "marketing_monthly": 30_000.0,
            "medical_assistant_count": 5,
            "nurse_count": 2,
            "admin_count": 3,
            "equipment_lease_monthly": 12_000.0,
        });

        let presets = [
            (ScenarioPreset::Lean, lean),
            (ScenarioPreset::Conservative, conservative),
            (ScenarioPreset::Moderate, moderate),
        ]
        .into_iter()
        .filter_map(|(preset, value)| match value {
            Value::Object(bundle) => Some((preset, bundle)),
            _ => None,
        })
        .collect();

        Self { presets }
    }
}

/// Reject bundles naming unknown fields or out-of-range values up front,
/// so a bad data file fails at load instead of at first use.
fn check_bundle(preset: ScenarioPreset, bundle: &PresetBundle) -> ProjResult<()> {
    for (field, value) in bundle {
        if field == SCENARIO_FIELD {
            continue;
        }
        let spec = field_spec(field).ok_or_else(|| ProjectionError::InvalidField {
            field:  field.clone(),
            reason: format!("unknown field in preset '{}'", preset.key()),
        })?;
        spec.check(value)?;
    }
    Ok(())
}
