use mso_projection_core::{
    engine::monthly_churn_rate,
    growth::{ExponentialGrowth, GrowthStrategy, LinearGrowth, SCurveGrowth},
    inputs::{GrowthCurve, ProjectionInputs},
    project,
};

// ── Strategies ───────────────────────────────────────────────────────────────

#[test]
fn linear_is_flat() {
    let curve = LinearGrowth;
    assert!((0..60).all(|m| curve.multiplier(m) == 1.0));
}

/// Increments peak near mid-horizon and the cumulative intake over the
/// horizon stays close to the linear curve's.
#[test]
fn s_curve_peaks_mid_horizon() {
    let curve = SCurveGrowth::new(12);
    let multipliers: Vec<f64> = (0..12).map(|m| curve.multiplier(m)).collect();

    let peak = multipliers
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(m, _)| m)
        .unwrap();
    assert!((5..=6).contains(&peak), "Expected peak at month 5 or 6, got {peak}");
    assert!(multipliers[0] < 0.5, "Early intake should be slow: {}", multipliers[0]);

    let cumulative: f64 = multipliers.iter().sum();
    assert!(
        (cumulative - 12.0).abs() < 1.0,
        "Horizon intake {cumulative} should be close to 12 linear months"
    );
}

#[test]
fn s_curve_tapers_after_horizon() {
    let curve = SCurveGrowth::new(12);
    assert!(curve.multiplier(12) < curve.multiplier(6));
    assert!(curve.multiplier(24) < 0.01, "Intake should saturate well past the horizon");
    assert!((0..60).all(|m| curve.multiplier(m) >= 0.0));
}

#[test]
fn exponential_compounds_until_horizon() {
    let curve = ExponentialGrowth::new(10.0, 6);
    assert_eq!(curve.multiplier(0), 1.0);
    assert!((curve.multiplier(3) - 1.1_f64.powi(3)).abs() < 1e-12);
    assert_eq!(curve.multiplier(6), curve.multiplier(20), "holds after the horizon");
}

#[test]
fn curve_selection_by_input() {
    let mut inputs = ProjectionInputs::default();
    for (curve, name) in [
        (GrowthCurve::Linear, "linear"),
        (GrowthCurve::SCurve, "s_curve"),
        (GrowthCurve::Exponential, "exponential"),
    ] {
        inputs.growth_curve = curve;
        assert_eq!(curve.strategy(&inputs).name(), name);
    }

    inputs.growth_curve = GrowthCurve::SCurve;
    inputs.growth_horizon_months = 0;
    assert_eq!(
        inputs.growth_curve.strategy(&inputs).name(),
        "linear",
        "An s-curve with no horizon has no shape"
    );
}

// ── Effect on the projection ─────────────────────────────────────────────────

#[test]
fn exponential_outgrows_linear() {
    let linear = project(&ProjectionInputs::default());

    let mut inputs = ProjectionInputs::default();
    inputs.growth_curve = GrowthCurve::Exponential;
    let exponential = project(&inputs);

    assert_eq!(
        linear.months[0].members.primary_active,
        exponential.months[0].members.primary_active,
        "Month 0 multiplier is 1 for both"
    );
    assert!(exponential.kpis.members_at_launch > linear.kpis.members_at_launch);
    assert!(exponential.kpis.launch_mrr > linear.kpis.launch_mrr);
}

#[test]
fn zero_intake_leaves_only_carryover() {
    let mut inputs = ProjectionInputs::default();
    inputs.primary_intake_per_physician = 0.0;
    inputs.primary_churn_annual_pct = 0.0;
    let result = project(&inputs);

    assert!(
        result.months.iter().all(|m| m.members.primary_active == 15.0),
        "No intake and no churn: carryover holds flat"
    );
}

#[test]
fn churn_rate_is_linear_monthly_share() {
    assert_eq!(monthly_churn_rate(0.0), 0.0);
    assert!((monthly_churn_rate(12.0) - 0.01).abs() < 1e-15);
    assert_eq!(monthly_churn_rate(f64::NAN), 0.0);
}
