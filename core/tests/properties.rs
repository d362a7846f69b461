//! Property checks over seeded random inputs.
//!
//! Every draw stays inside the declared field ranges, so each generated
//! record would pass `validate()`. The seed is fixed: failures reproduce.

use mso_projection_core::{
    inputs::{GrowthCurve, ProjectionInputs},
    project,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const SEED: u64 = 0x4D53_4F5F_4C41_554E;
const CASES: usize = 200;

fn random_inputs(rng: &mut Pcg64Mcg) -> ProjectionInputs {
    let curve = match rng.gen_range(0..3) {
        0 => GrowthCurve::Linear,
        1 => GrowthCurve::SCurve,
        _ => GrowthCurve::Exponential,
    };

    ProjectionInputs {
        founding_physician: rng.gen_bool(0.8),
        additional_physicians: rng.gen_range(0..=6),
        primary_carryover_per_physician: rng.gen_range(0.0..200.0),
        specialty_carryover_per_physician: rng.gen_range(0.0..200.0),
        primary_intake_per_physician: rng.gen_range(0.0..20.0),
        specialty_intake_per_physician: rng.gen_range(0.0..20.0),
        primary_churn_annual_pct: rng.gen_range(0.0..=100.0),
        specialty_churn_annual_pct: rng.gen_range(0.0..=100.0),
        growth_curve: curve,
        growth_horizon_months: rng.gen_range(0..=24),
        exponential_growth_pct: rng.gen_range(0.0..15.0),
        primary_price: rng.gen_range(0.0..1_000.0),
        specialty_price: rng.gen_range(0.0..1_000.0),
        corporate_enabled: rng.gen_bool(0.5),
        corporate_start_month: rng.gen_range(0..=18),
        corporate_contracts_per_month: rng.gen_range(0.0..5.0),
        employees_per_contract: rng.gen_range(0.0..100.0),
        diagnostics_enabled: rng.gen_bool(0.5),
        diagnostics_start_month: rng.gen_range(0..=18),
        equipment_lease_monthly: rng.gen_range(0.0..20_000.0),
        variable_cost_pct: rng.gen_range(0.0..=40.0),
        nurse_start_month: rng.gen_range(0..=6),
        ramp_months: rng.gen_range(1..=12),
        projection_months: rng.gen_range(1..=24),
        roi_reference_month: rng.gen_range(0..=36),
        starting_capital: rng.gen_range(0.0..1_000_000.0),
        ..ProjectionInputs::default()
    }
}

fn cases() -> impl Iterator<Item = (usize, ProjectionInputs)> {
    let mut rng = Pcg64Mcg::seed_from_u64(SEED);
    (0..CASES).map(move |i| (i, random_inputs(&mut rng)))
}

#[test]
fn generated_inputs_are_valid() {
    for (i, inputs) in cases() {
        inputs
            .validate()
            .unwrap_or_else(|e| panic!("case {i}: generator produced invalid inputs: {e}"));
    }
}

#[test]
fn members_and_revenue_are_never_negative() {
    for (i, inputs) in cases() {
        let result = project(&inputs);
        for m in &result.months {
            assert!(m.members.primary_active >= 0.0, "case {i} month {}: primary", m.month);
            assert!(m.members.specialty_active >= 0.0, "case {i} month {}: specialty", m.month);
            assert!(m.revenue.total >= 0.0, "case {i} month {}: revenue", m.month);
            assert!(m.costs.total >= 0.0, "case {i} month {}: costs", m.month);
            assert!(m.cumulative_cash.is_finite(), "case {i} month {}: cash", m.month);
        }
    }
}

#[test]
fn horizon_and_launch_are_consistent() {
    for (i, inputs) in cases() {
        let result = project(&inputs);
        let expected_len = (inputs.ramp_months + inputs.projection_months) as usize;
        assert_eq!(result.months.len(), expected_len, "case {i}: horizon length");
        assert_eq!(result.launch.record.month, inputs.ramp_months, "case {i}: launch month");
        assert_eq!(
            result.launch.record,
            result.months[inputs.ramp_months as usize],
            "case {i}: launch snapshot"
        );
    }
}

/// Raising either churn rate never adds members to that population.
#[test]
fn churn_is_monotone() {
    for (i, inputs) in cases() {
        let mut higher = inputs.clone();
        higher.primary_churn_annual_pct = (inputs.primary_churn_annual_pct + 10.0).min(100.0);
        higher.specialty_churn_annual_pct = (inputs.specialty_churn_annual_pct + 10.0).min(100.0);

        let base = project(&inputs);
        let churned = project(&higher);
        for (a, b) in base.months.iter().zip(&churned.months).skip(1) {
            assert!(
                b.members.primary_active <= a.members.primary_active + 1e-9,
                "case {i} month {}: {} primary members at higher churn vs {}",
                a.month,
                b.members.primary_active,
                a.members.primary_active
            );
            assert!(
                b.members.specialty_active <= a.members.specialty_active + 1e-9,
                "case {i} month {}: {} specialty patients at higher churn vs {}",
                a.month,
                b.members.specialty_active,
                a.members.specialty_active
            );
        }
    }
}

#[test]
fn breakeven_matches_cash_series() {
    for (i, inputs) in cases() {
        let result = project(&inputs);
        let first_non_negative = result
            .months
            .iter()
            .find(|m| m.cumulative_cash >= 0.0)
            .map(|m| m.month);
        assert_eq!(result.kpis.breakeven_month, first_non_negative, "case {i}");
    }
}

#[test]
fn projection_is_idempotent_for_random_inputs() {
    for (i, inputs) in cases().take(50) {
        assert_eq!(project(&inputs), project(&inputs), "case {i}");
    }
}
