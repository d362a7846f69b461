//! Declared kind and valid range for every Input Model field.
//!
//! This table is the edit boundary. Keep it in the same order as the
//! struct in inputs.rs; a missing row makes the field unreachable
//! through `set_field` and rejects it in `from_value`.

use crate::error::{ProjResult, ProjectionError};
use serde_json::Value;

pub const SCENARIO_FIELD: &str = "scenario";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    /// Non-negative whole number (counts, months).
    Integer,
    Flag,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub min:  f64,
    pub max:  f64,
}

impl FieldSpec {
    const fn number(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, kind: FieldKind::Number, min, max }
    }

    const fn integer(name: &'static str, min: f64, max: f64) -> Self {
        Self { name, kind: FieldKind::Integer, min, max }
    }

    const fn flag(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Flag, min: 0.0, max: 1.0 }
    }

    const fn choice(name: &'static str, options: &'static [&'static str]) -> Self {
        Self { name, kind: FieldKind::Choice(options), min: 0.0, max: 0.0 }
    }

    /// Type check only. Used when a stored snapshot is loaded.
    pub fn check_type(&self, value: &Value) -> ProjResult<()> {
        let ok = match self.kind {
            FieldKind::Number  => value.as_f64().is_some(),
            FieldKind::Integer => value.as_u64().is_some_and(|v| v <= u32::MAX as u64),
            FieldKind::Flag    => value.is_boolean(),
            FieldKind::Choice(options) => value.as_str().is_some_and(|s| options.contains(&s)),
        };
        if ok {
            return Ok(());
        }

        let expected = match self.kind {
            FieldKind::Number  => "a number".to_string(),
            FieldKind::Integer => "a non-negative integer".to_string(),
            FieldKind::Flag    => "a boolean".to_string(),
            FieldKind::Choice(options) => format!("one of {}", options.join(" | ")),
        };
        Err(ProjectionError::InvalidField {
            field:  self.name.to_string(),
            reason: format!("expected {expected}, got {value}"),
        })
    }

    /// Type and range check. Used at the edit boundary.
    pub fn check(&self, value: &Value) -> ProjResult<()> {
        self.check_type(value)?;
        if matches!(self.kind, FieldKind::Number | FieldKind::Integer) {
            let v = value.as_f64().unwrap_or(f64::NAN);
            if !(self.min..=self.max).contains(&v) {
                return Err(ProjectionError::OutOfRange {
                    field: self.name.to_string(),
                    value: v,
                    min:   self.min,
                    max:   self.max,
                });
            }
        }
        Ok(())
    }
}

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::choice(SCENARIO_FIELD, &["lean", "conservative", "moderate"]),
    // Physician setup
    FieldSpec::flag("founding_physician"),
    FieldSpec::integer("additional_physicians", 0.0, 20.0),
    FieldSpec::number("primary_carryover_per_physician", 0.0, 2_000.0),
    FieldSpec::number("specialty_carryover_per_physician", 0.0, 2_000.0),
    // Growth & churn
    FieldSpec::number("primary_intake_per_physician", 0.0, 200.0),
    FieldSpec::number("specialty_intake_per_physician", 0.0, 200.0),
    FieldSpec::number("primary_churn_annual_pct", 0.0, 100.0),
    FieldSpec::number("specialty_churn_annual_pct", 0.0, 100.0),
    FieldSpec::choice("growth_curve", &["linear", "s_curve", "exponential"]),
    FieldSpec::integer("growth_horizon_months", 0.0, 60.0),
    FieldSpec::number("exponential_growth_pct", 0.0, 100.0),
    // Pricing
    FieldSpec::number("primary_price", 0.0, 5_000.0),
    FieldSpec::number("specialty_price", 0.0, 10_000.0),
    FieldSpec::number("corporate_price_per_employee", 0.0, 1_000.0),
    FieldSpec::number("echo_price", 0.0, 20_000.0),
    FieldSpec::number("ct_price", 0.0, 20_000.0),
    FieldSpec::number("labs_price", 0.0, 20_000.0),
    FieldSpec::number("echo_utilization", 0.0, 5.0),
    FieldSpec::number("ct_utilization", 0.0, 5.0),
    FieldSpec::number("labs_utilization", 0.0, 5.0),
    // Activation gates
    FieldSpec::integer("primary_start_month", 0.0, 60.0),
    FieldSpec::integer("specialty_start_month", 0.0, 60.0),
    FieldSpec::flag("corporate_enabled"),
    FieldSpec::integer("corporate_start_month", 0.0, 60.0),
    FieldSpec::number("corporate_contracts_per_month", 0.0, 50.0),
    FieldSpec::number("employees_per_contract", 0.0, 5_000.0),
    FieldSpec::flag("diagnostics_enabled"),
    FieldSpec::integer("diagnostics_start_month", 0.0, 60.0),
    // Costs
    FieldSpec::number("fixed_overhead_monthly", 0.0, 1_000_000.0),
    FieldSpec::number("marketing_monthly", 0.0, 500_000.0),
    FieldSpec::number("variable_cost_pct", 0.0, 100.0),
    FieldSpec::integer("medical_assistant_count", 0.0, 50.0),
    FieldSpec::number("medical_assistant_salary", 0.0, 500_000.0),
    FieldSpec::integer("medical_assistant_start_month", 0.0, 60.0),
    FieldSpec::integer("nurse_count", 0.0, 50.0),
    FieldSpec::number("nurse_salary", 0.0, 500_000.0),
    FieldSpec::integer("nurse_start_month", 0.0, 60.0),
    FieldSpec::integer("admin_count", 0.0, 50.0),
    FieldSpec::number("admin_salary", 0.0, 500_000.0),
    FieldSpec::integer("admin_start_month", 0.0, 60.0),
    FieldSpec::number("equipment_lease_monthly", 0.0, 200_000.0),
    // Horizon & cash
    FieldSpec::integer("ramp_months", 1.0, 24.0),
    FieldSpec::integer("projection_months", 1.0, 60.0),
    FieldSpec::integer("roi_reference_month", 0.0, 84.0),
    FieldSpec::number("starting_capital", 0.0, 50_000_000.0),
];

pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}
