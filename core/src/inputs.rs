//! The Input Model: one flat record of business assumptions per scenario.
//!
//! RULE: the simulator never validates. Ranges are enforced here, at the
//! edit boundary (`set_field`, `apply_preset`, `validate`), and types are
//! enforced when a snapshot crosses a JSON boundary (`from_value`).

use crate::{
    config::PresetCatalog,
    error::{ProjResult, ProjectionError},
    fields::{field_spec, FIELDS, SCENARIO_FIELD},
    types::{Dollars, Month},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named scenario presets. Changing the selector bulk-overwrites numeric
/// fields with the preset bundle; the selector itself is preserved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    Lean,
    Conservative,
    Moderate,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 3] = [
        ScenarioPreset::Lean,
        ScenarioPreset::Conservative,
        ScenarioPreset::Moderate,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ScenarioPreset::Lean         => "lean",
            ScenarioPreset::Conservative => "conservative",
            ScenarioPreset::Moderate     => "moderate",
        }
    }

    pub fn from_key(key: &str) -> ProjResult<Self> {
        let wanted = key.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == wanted)
            .ok_or_else(|| ProjectionError::UnknownPreset { key: key.to_string() })
    }
}

/// Shape of the member-intake curve. Dispatched once per run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrowthCurve {
    Linear,
    SCurve,
    Exponential,
}

/// Revenue streams, in reporting order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RevenueStream {
    Primary,
    Specialty,
    Corporate,
    Echo,
    Ct,
    Labs,
}

impl RevenueStream {
    pub const ALL: [RevenueStream; 6] = [
        RevenueStream::Primary,
        RevenueStream::Specialty,
        RevenueStream::Corporate,
        RevenueStream::Echo,
        RevenueStream::Ct,
        RevenueStream::Labs,
    ];

    pub fn is_diagnostic(self) -> bool {
        matches!(self, RevenueStream::Echo | RevenueStream::Ct | RevenueStream::Labs)
    }
}

/// The (flag, start month) pair that controls when a stream contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationGate {
    pub enabled:     bool,
    pub start_month: Month,
}

impl ActivationGate {
    pub fn always_from(start_month: Month) -> Self {
        Self { enabled: true, start_month }
    }

    pub fn is_open(&self, month: Month) -> bool {
        self.enabled && month >= self.start_month
    }

    /// Months elapsed since the gate opened, counting the opening month as 1.
    pub fn months_open(&self, month: Month) -> u32 {
        if self.is_open(month) {
            month - self.start_month + 1
        } else {
            0
        }
    }

    /// True only on the first month the gate is open.
    pub fn opens_at(&self, month: Month) -> bool {
        self.is_open(month) && month == self.start_month
    }
}

/// A salaried role on the MSO payroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffRole {
    pub label:         &'static str,
    pub count:         u32,
    pub annual_salary: Dollars,
    pub start_month:   Month,
}

impl StaffRole {
    pub fn on_payroll(&self, month: Month) -> bool {
        month >= self.start_month
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectionInputs {
    pub scenario: ScenarioPreset,

    // ── Physician setup ────────────────────────────
    pub founding_physician:                bool,
    pub additional_physicians:             u32,
    pub primary_carryover_per_physician:   f64,
    pub specialty_carryover_per_physician: f64,

    // ── Growth & churn ─────────────────────────────
    pub primary_intake_per_physician:   f64,
    pub specialty_intake_per_physician: f64,
    pub primary_churn_annual_pct:       f64,
    pub specialty_churn_annual_pct:     f64,
    pub growth_curve:                   GrowthCurve,
    pub growth_horizon_months:          Month,
    pub exponential_growth_pct:         f64,

    // ── Pricing ────────────────────────────────────
    pub primary_price:                Dollars,
    pub specialty_price:              Dollars,
    pub corporate_price_per_employee: Dollars,
    pub echo_price:                   Dollars,
    pub ct_price:                     Dollars,
    pub labs_price:                   Dollars,
    pub echo_utilization:             f64,
    pub ct_utilization:               f64,
    pub labs_utilization:             f64,

    // ── Activation gates ───────────────────────────
    pub primary_start_month:           Month,
    pub specialty_start_month:         Month,
    pub corporate_enabled:             bool,
    pub corporate_start_month:         Month,
    pub corporate_contracts_per_month: f64,
    pub employees_per_contract:        f64,
    pub diagnostics_enabled:           bool,
    pub diagnostics_start_month:       Month,

    // ── Costs ──────────────────────────────────────
    pub fixed_overhead_monthly:        Dollars,
    pub marketing_monthly:             Dollars,
    pub variable_cost_pct:             f64,
    pub medical_assistant_count:       u32,
    pub medical_assistant_salary:      Dollars,
    pub medical_assistant_start_month: Month,
    pub nurse_count:                   u32,
    pub nurse_salary:                  Dollars,
    pub nurse_start_month:             Month,
    pub admin_count:                   u32,
    pub admin_salary:                  Dollars,
    pub admin_start_month:             Month,
    pub equipment_lease_monthly:       Dollars,

    // ── Horizon & cash ─────────────────────────────
    pub ramp_months:         Month,
    pub projection_months:   Month,
    pub roi_reference_month: Month,
    pub starting_capital:    Dollars,
}

impl Default for ProjectionInputs {
    /// The "lean" launch: one founding physician, no optional streams.
    fn default() -> Self {
        Self {
            scenario: ScenarioPreset::Lean,

            founding_physician:                true,
            additional_physicians:             0,
            primary_carryover_per_physician:   15.0,
            specialty_carryover_per_physician: 25.0,

            primary_intake_per_physician:   2.0,
            specialty_intake_per_physician: 1.0,
            primary_churn_annual_pct:       5.0,
            specialty_churn_annual_pct:     5.0,
            growth_curve:                   GrowthCurve::Linear,
            growth_horizon_months:          12,
            exponential_growth_pct:         8.0,

            primary_price:                450.0,
            specialty_price:              450.0,
            corporate_price_per_employee: 75.0,
            echo_price:                   500.0,
            ct_price:                     1_200.0,
            labs_price:                   150.0,
            echo_utilization:             0.02,
            ct_utilization:               0.01,
            labs_utilization:             0.10,

            primary_start_month:           0,
            specialty_start_month:         0,
            corporate_enabled:             false,
            corporate_start_month:         9,
            corporate_contracts_per_month: 1.0,
            employees_per_contract:        25.0,
            diagnostics_enabled:           false,
            diagnostics_start_month:       6,

            fixed_overhead_monthly:        50_000.0,
            marketing_monthly:             25_000.0,
            variable_cost_pct:             10.0,
            medical_assistant_count:       2,
            medical_assistant_salary:      42_000.0,
            medical_assistant_start_month: 0,
            nurse_count:                   1,
            nurse_salary:                  85_000.0,
            nurse_start_month:             0,
            admin_count:                   1,
            admin_salary:                  48_000.0,
            admin_start_month:             0,
            equipment_lease_monthly:       0.0,

            ramp_months:         7,
            projection_months:   12,
            roi_reference_month: 12,
            starting_capital:    0.0,
        }
    }
}

impl ProjectionInputs {
    /// Strict parse of a JSON snapshot. Fails on the first missing,
    /// unknown, or mistyped field, naming it.
    pub fn from_value(value: Value) -> ProjResult<Self> {
        let obj = value.as_object().ok_or_else(|| ProjectionError::InvalidField {
            field:  "<root>".into(),
            reason: "expected a JSON object".into(),
        })?;

        if let Some(unknown) = obj.keys().find(|k| field_spec(k).is_none()) {
            return Err(ProjectionError::InvalidField {
                field:  unknown.clone(),
                reason: "unknown field".into(),
            });
        }

        for spec in FIELDS {
            match obj.get(spec.name) {
                None => {
                    return Err(ProjectionError::MissingField {
                        field: spec.name.to_string(),
                    })
                }
                Some(v) => spec.check_type(v)?,
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(json: &str) -> ProjResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Edit one field. The whole record is replaced only if the new value
    /// passes its type and range check. The scenario selector is not a
    /// plain field: changing it goes through `apply_preset`.
    pub fn set_field(&mut self, field: &str, value: Value) -> ProjResult<()> {
        if field == SCENARIO_FIELD {
            return Err(ProjectionError::InvalidField {
                field:  SCENARIO_FIELD.into(),
                reason: "use apply_preset".into(),
            });
        }
        let spec = field_spec(field).ok_or_else(|| ProjectionError::InvalidField {
            field:  field.to_string(),
            reason: "unknown field".into(),
        })?;
        spec.check(&value)?;

        let mut obj = serde_json::to_value(&*self)?;
        obj[spec.name] = value;
        *self = serde_json::from_value(obj)?;
        Ok(())
    }

    /// Overwrite fields from the preset bundle and select the preset.
    /// All-or-nothing: a bad bundle entry leaves `self` untouched.
    pub fn apply_preset(
        &mut self,
        catalog: &PresetCatalog,
        preset: ScenarioPreset,
    ) -> ProjResult<()> {
        let bundle = catalog.get_preset(preset)?;
        let mut obj = serde_json::to_value(&*self)?;

        for (field, value) in bundle {
            if field == SCENARIO_FIELD {
                continue;
            }
            let spec = field_spec(field).ok_or_else(|| ProjectionError::InvalidField {
                field:  field.clone(),
                reason: format!("unknown field in preset '{}'", preset.key()),
            })?;
            spec.check(value)?;
            obj[spec.name] = value.clone();
        }
        obj[SCENARIO_FIELD] = serde_json::to_value(preset)?;

        *self = serde_json::from_value(obj)?;
        log::debug!("applied preset '{}' ({} fields)", preset.key(), bundle.len());
        Ok(())
    }

    /// Check every declared range. Returns the first violation.
    pub fn validate(&self) -> ProjResult<()> {
        let obj = serde_json::to_value(self)?;
        for spec in FIELDS {
            spec.check(&obj[spec.name])?;
        }
        Ok(())
    }

    pub fn gate(&self, stream: RevenueStream) -> ActivationGate {
        match stream {
            RevenueStream::Primary   => ActivationGate::always_from(self.primary_start_month),
            RevenueStream::Specialty => ActivationGate::always_from(self.specialty_start_month),
            RevenueStream::Corporate => ActivationGate {
                enabled:     self.corporate_enabled,
                start_month: self.corporate_start_month,
            },
            RevenueStream::Echo | RevenueStream::Ct | RevenueStream::Labs => self.diagnostics_gate(),
        }
    }

    pub fn diagnostics_gate(&self) -> ActivationGate {
        ActivationGate {
            enabled:     self.diagnostics_enabled,
            start_month: self.diagnostics_start_month,
        }
    }

    /// Equipment lease accrues once this gate opens. Only diagnostics carry
    /// equipment today.
    pub fn equipment_gate(&self) -> ActivationGate {
        self.diagnostics_gate()
    }

    /// (price per unit, units per eligible member per month) for a diagnostic stream.
    pub fn diagnostic_pricing(&self, stream: RevenueStream) -> (Dollars, f64) {
        match stream {
            RevenueStream::Echo => (self.echo_price, self.echo_utilization),
            RevenueStream::Ct   => (self.ct_price, self.ct_utilization),
            RevenueStream::Labs => (self.labs_price, self.labs_utilization),
            _ => (0.0, 0.0),
        }
    }

    pub fn staff_roles(&self) -> [StaffRole; 3] {
        [
            StaffRole {
                label:         "medical_assistant",
                count:         self.medical_assistant_count,
                annual_salary: self.medical_assistant_salary,
                start_month:   self.medical_assistant_start_month,
            },
            StaffRole {
                label:         "nurse",
                count:         self.nurse_count,
                annual_salary: self.nurse_salary,
                start_month:   self.nurse_start_month,
            },
            StaffRole {
                label:         "admin",
                count:         self.admin_count,
                annual_salary: self.admin_salary,
                start_month:   self.admin_start_month,
            },
        ]
    }
}
