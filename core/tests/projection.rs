//! Integration tests for the month loop: launch snapshot, gating, churn,
//! cash continuity and KPI windows.

use mso_projection_core::{
    config::PresetCatalog,
    event::ProjectionEvent,
    inputs::{ProjectionInputs, RevenueStream, ScenarioPreset},
    project,
    projection::Phase,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

const EPS: f64 = 1e-6;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn lean() -> ProjectionInputs {
    init_logging();
    ProjectionInputs::default()
}

fn preset(preset: ScenarioPreset) -> ProjectionInputs {
    init_logging();
    let mut inputs = ProjectionInputs::default();
    inputs
        .apply_preset(&PresetCatalog::builtin(), preset)
        .expect("builtin preset applies");
    inputs
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPS * expected.abs().max(1.0),
        "{what}: expected {expected}, got {actual}"
    );
}

// ── Lean scenario ────────────────────────────────────────────────────────────

/// Month 0 gets carryover plus one month of intake, then one month of churn.
#[test]
fn lean_month_zero_matches_hand_computation() {
    let result = project(&lean());
    let m0 = &result.months[0];

    let primary = (15.0 + 2.0) * (1.0 - 0.05 / 12.0);
    let specialty = (25.0 + 1.0) * (1.0 - 0.05 / 12.0);
    assert_close(m0.members.primary_active, primary, "month 0 primary");
    assert_close(m0.members.specialty_active, specialty, "month 0 specialty");

    let revenue = primary * 450.0 + specialty * 450.0;
    assert_close(m0.revenue.total, revenue, "month 0 revenue");

    let salaries = (2.0 * 42_000.0 + 85_000.0 + 48_000.0) / 12.0;
    assert_close(m0.costs.salaries, salaries, "month 0 salaries");
    assert_close(m0.costs.fixed_overhead, 75_000.0, "month 0 overhead + marketing");
    assert_close(m0.costs.variable, revenue * 0.10, "month 0 variable cost");
    assert_close(m0.profit, revenue - m0.costs.total, "month 0 profit");
    assert_close(m0.cumulative_cash, m0.profit, "month 0 cash from zero capital");
}

/// One founding physician at $450 lands in the tens of members and tens of
/// thousands of MRR at launch, still losing money.
#[test]
fn lean_launch_is_small_and_unprofitable() {
    let result = project(&lean());
    let launch = &result.launch.record;

    assert_eq!(launch.month, 7, "launch month should equal ramp_months");
    assert!(
        launch.members.primary_active > 10.0 && launch.members.primary_active < 50.0,
        "Expected 10-50 primary members at launch, got {}",
        launch.members.primary_active
    );
    assert!(
        result.kpis.launch_mrr > 10_000.0 && result.kpis.launch_mrr < 40_000.0,
        "Expected launch MRR between $10k and $40k, got {}",
        result.kpis.launch_mrr
    );
    assert!(launch.profit < 0.0, "Lean launch should still lose money, got {}", launch.profit);
    assert_eq!(result.kpis.breakeven_month, None, "Lean never breaks even in 19 months");
}

#[test]
fn horizon_covers_ramp_plus_projection() {
    let result = project(&lean());
    assert_eq!(result.months.len(), 19, "7 ramp months + 12 post-launch months");

    for (i, m) in result.months.iter().enumerate() {
        assert_eq!(m.month as usize, i, "months must be ordered from 0");
        let expected = if i < 7 { Phase::Ramp } else { Phase::PostLaunch };
        assert_eq!(m.phase, expected, "month {i} phase");
    }
}

/// A zero-length post-launch window still simulates the launch month.
#[test]
fn single_projection_month_still_reaches_launch() {
    let mut inputs = lean();
    inputs.projection_months = 1;
    let result = project(&inputs);

    assert_eq!(result.months.len(), 8);
    assert_eq!(result.launch.record.month, 7);
    assert_close(
        result.kpis.total_revenue_12mo,
        result.months[7].revenue.total,
        "one-month window revenue",
    );
}

// ── Launch snapshot ──────────────────────────────────────────────────────────

#[test]
fn launch_snapshot_is_the_launch_month_verbatim() {
    let result = project(&lean());
    assert_eq!(result.launch.record, result.months[7]);
    assert_eq!(result.kpis.members_at_launch, result.months[7].members.primary_active);
    assert_eq!(result.kpis.cash_at_launch, result.months[7].cumulative_cash);
    assert_eq!(result.kpis.launch_mrr, result.months[7].revenue.total);
    assert_eq!(result.month(7), Some(&result.launch.record));
    assert_eq!(result.month(19), None, "horizon ends at month 18");
}

#[test]
fn stream_lookup_sums_to_total() {
    let result = project(&preset(ScenarioPreset::Moderate));
    for m in &result.months {
        let sum: f64 = RevenueStream::ALL.iter().map(|s| m.revenue.stream(*s)).sum();
        assert_close(sum, m.revenue.total, &format!("month {} stream sum", m.month));
    }
    let m12 = result.month(12).expect("month 12 in horizon");
    assert_eq!(m12.revenue.stream(RevenueStream::Corporate), m12.revenue.corporate);
}

#[test]
fn launch_lists_active_services_and_team() {
    let result = project(&lean());
    assert_eq!(
        result.launch.active_services,
        vec![RevenueStream::Primary, RevenueStream::Specialty],
        "Only primary and specialty run in the lean scenario"
    );
    // 1 physician + 2 MAs + 1 nurse + 1 admin
    assert_eq!(result.launch.team_headcount, 5);

    let result = project(&preset(ScenarioPreset::Moderate));
    assert!(
        result.launch.active_services.contains(&RevenueStream::Echo),
        "Moderate diagnostics start at month 6, before launch"
    );
    assert!(
        !result.launch.active_services.contains(&RevenueStream::Corporate),
        "Moderate corporate starts at month 9, after launch"
    );
}

// ── Churn ────────────────────────────────────────────────────────────────────

/// Raising churn from 5% to 15% must lower members at every post-launch
/// month and lower launch MRR.
#[test]
fn higher_churn_means_fewer_members() {
    let base = project(&lean());

    let mut high = lean();
    high.primary_churn_annual_pct = 15.0;
    let churned = project(&high);

    for m in 7..base.months.len() {
        let before = base.months[m].members.primary_active;
        let after = churned.months[m].members.primary_active;
        assert!(
            after < before,
            "month {m}: 15% churn should leave fewer members ({after}) than 5% ({before})"
        );
    }
    assert!(churned.kpis.launch_mrr.is_finite());
    assert!(
        churned.kpis.launch_mrr < base.kpis.launch_mrr,
        "launch MRR {} should drop below {}",
        churned.kpis.launch_mrr,
        base.kpis.launch_mrr
    );
}

/// Same property for the specialty population.
#[test]
fn higher_specialty_churn_means_fewer_patients() {
    let base = project(&lean());

    let mut high = lean();
    high.specialty_churn_annual_pct = 15.0;
    let churned = project(&high);

    for m in 1..base.months.len() {
        let before = base.months[m].members.specialty_active;
        let after = churned.months[m].members.specialty_active;
        assert!(
            after < before,
            "month {m}: 15% churn should leave fewer patients ({after}) than 5% ({before})"
        );
    }
    assert!(churned.kpis.launch_mrr < base.kpis.launch_mrr);
}

#[test]
fn full_churn_is_bounded() {
    let mut inputs = lean();
    inputs.primary_churn_annual_pct = 100.0;
    inputs.specialty_churn_annual_pct = 100.0;
    let result = project(&inputs);

    // 100% a year is 1/12 of the post-growth count each month.
    for m in &result.months {
        assert!(m.members.primary_active >= 0.0, "month {}: negative members", m.month);
        let grown = m.members.primary_active + m.members.primary_churned;
        assert_close(m.members.primary_churned, grown / 12.0, "monthly churn share");
    }
}

// ── Continuity across the launch boundary ────────────────────────────────────

/// Accumulators never reset: every month continues from the previous one,
/// including ramp → post-launch.
#[test]
fn accumulators_continue_across_launch() {
    let result = project(&preset(ScenarioPreset::Conservative));

    for pair in result.months.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        assert_close(
            cur.members.primary_active,
            prev.members.primary_active + cur.members.primary_added - cur.members.primary_churned,
            &format!("month {} primary continuity", cur.month),
        );
        assert_close(
            cur.members.specialty_active,
            prev.members.specialty_active + cur.members.specialty_added
                - cur.members.specialty_churned,
            &format!("month {} specialty continuity", cur.month),
        );
        assert_close(
            cur.cumulative_cash,
            prev.cumulative_cash + cur.profit,
            &format!("month {} cash continuity", cur.month),
        );
    }
}

#[test]
fn starting_capital_shifts_cash_only() {
    let base = project(&lean());

    let mut funded = lean();
    funded.starting_capital = 2_000_000.0;
    let result = project(&funded);

    for (a, b) in base.months.iter().zip(&result.months) {
        assert_eq!(a.profit, b.profit, "month {}: profit must not depend on capital", a.month);
        assert_close(
            b.cumulative_cash - a.cumulative_cash,
            2_000_000.0,
            &format!("month {} capital offset", a.month),
        );
    }
    assert_eq!(result.kpis.breakeven_month, Some(0), "Funded launch is never below zero");
}

// ── Activation gates ─────────────────────────────────────────────────────────

#[test]
fn diagnostics_and_lease_wait_for_start_month() {
    let mut inputs = lean();
    inputs.diagnostics_enabled = true;
    inputs.diagnostics_start_month = 6;
    inputs.equipment_lease_monthly = 5_000.0;
    let result = project(&inputs);

    for m in &result.months {
        let diagnostics = m.revenue.echo + m.revenue.ct + m.revenue.labs;
        if m.month < 6 {
            assert_eq!(diagnostics, 0.0, "month {}: diagnostics before start", m.month);
            assert_eq!(m.costs.equipment_lease, 0.0, "month {}: lease before start", m.month);
        } else {
            let eligible = m.members.primary_active + m.members.specialty_active;
            assert_close(m.revenue.echo, eligible * 500.0 * 0.02, "echo revenue");
            assert_close(m.revenue.ct, eligible * 1_200.0 * 0.01, "ct revenue");
            assert_close(m.revenue.labs, eligible * 150.0 * 0.10, "labs revenue");
            assert_eq!(m.costs.equipment_lease, 5_000.0, "month {}: lease", m.month);
        }
    }
}

#[test]
fn disabled_diagnostics_never_charge_lease() {
    let mut inputs = lean();
    inputs.diagnostics_enabled = false;
    inputs.equipment_lease_monthly = 5_000.0;
    let result = project(&inputs);

    assert!(
        result.months.iter().all(|m| m.costs.equipment_lease == 0.0),
        "Lease should be gated on diagnostics"
    );
}

/// Corporate covered lives grow by contracts × employees every month the
/// gate has been open, counting the start month.
#[test]
fn corporate_revenue_accumulates_contracts() {
    let mut inputs = lean();
    inputs.corporate_enabled = true;
    inputs.corporate_start_month = 9;
    inputs.corporate_contracts_per_month = 2.0;
    inputs.employees_per_contract = 10.0;
    let result = project(&inputs);

    assert_eq!(result.months[8].members.corporate_covered, 0.0);
    assert_eq!(result.months[8].revenue.corporate, 0.0);
    assert_eq!(result.months[9].members.corporate_covered, 20.0);
    assert_eq!(result.months[10].members.corporate_covered, 40.0);
    assert_close(result.months[10].revenue.corporate, 40.0 * 75.0, "month 10 corporate");
}

/// A late primary start delays billing but not enrollment.
#[test]
fn primary_start_month_gates_revenue_only() {
    let mut inputs = lean();
    inputs.primary_start_month = 3;
    let result = project(&inputs);

    for m in &result.months[..3] {
        assert_eq!(m.revenue.primary, 0.0, "month {}: primary billed early", m.month);
        assert!(m.members.primary_active > 0.0, "month {}: members still enroll", m.month);
    }
    assert!(result.months[3].revenue.primary > 0.0);
}

#[test]
fn staff_hire_month_defers_salary() {
    let mut inputs = lean();
    inputs.nurse_start_month = 4;
    let result = project(&inputs);

    let without_nurse = (2.0 * 42_000.0 + 48_000.0) / 12.0;
    let with_nurse = without_nurse + 85_000.0 / 12.0;
    assert_close(result.months[3].costs.salaries, without_nurse, "month 3 salaries");
    assert_close(result.months[4].costs.salaries, with_nurse, "month 4 salaries");
    assert_eq!(result.months[3].headcount, 4);
    assert_eq!(result.months[4].headcount, 5);
}

// ── Degenerate inputs ────────────────────────────────────────────────────────

#[test]
fn zero_physicians_degenerates_to_zero_revenue() {
    let mut inputs = lean();
    inputs.founding_physician = false;
    inputs.additional_physicians = 0;
    let result = project(&inputs);

    assert_eq!(result.derived.total_physicians, 0);
    for m in &result.months {
        assert_eq!(m.members.primary_active, 0.0, "month {}", m.month);
        assert_eq!(m.revenue.total, 0.0, "month {}", m.month);
        assert!(m.costs.total > 0.0, "month {}: overhead still accrues", m.month);
        assert!(m.cumulative_cash.is_finite(), "month {}", m.month);
    }
    assert_eq!(result.physicians.founding.specialty_revenue, 0.0);
}

#[test]
fn zero_prices_produce_zero_revenue() {
    let mut inputs = lean();
    inputs.primary_price = 0.0;
    inputs.specialty_price = 0.0;
    let result = project(&inputs);

    assert!(result.months.iter().all(|m| m.revenue.total == 0.0));
    assert!(result.months.iter().all(|m| m.costs.variable == 0.0));
}

// ── KPIs ─────────────────────────────────────────────────────────────────────

#[test]
fn kpi_windows_sum_the_right_months() {
    let result = project(&preset(ScenarioPreset::Moderate));

    let ramp_profit: f64 = result.months[..7].iter().map(|m| m.profit).sum();
    assert_close(result.kpis.total_ramp_burn, -ramp_profit, "ramp burn");

    let revenue: f64 = result.months[7..19].iter().map(|m| m.revenue.total).sum();
    let profit: f64 = result.months[7..19].iter().map(|m| m.profit).sum();
    assert_close(result.kpis.total_revenue_12mo, revenue, "12mo revenue");
    assert_close(result.kpis.total_profit_12mo, profit, "12mo profit");

    let peak = result
        .months
        .iter()
        .map(|m| m.members.primary_active)
        .fold(0.0, f64::max);
    assert_eq!(result.kpis.peak_members, peak);
    assert_eq!(result.kpis.ending_cash, result.months[18].cumulative_cash);
}

#[test]
fn breakeven_is_first_non_negative_cash_month() {
    for scenario in ScenarioPreset::ALL {
        let result = project(&preset(scenario));
        match result.kpis.breakeven_month {
            Some(b) => {
                assert!(result.months[b as usize].cumulative_cash >= 0.0);
                assert!(
                    result.months[..b as usize].iter().all(|m| m.cumulative_cash < 0.0),
                    "{scenario:?}: an earlier month already broke even"
                );
            }
            None => assert!(
                result.months.iter().all(|m| m.cumulative_cash < 0.0),
                "{scenario:?}: cash went non-negative but no breakeven was reported"
            ),
        }
    }
}

#[test]
fn moderate_breaks_even_in_month_six() {
    let result = project(&preset(ScenarioPreset::Moderate));
    assert_eq!(result.kpis.breakeven_month, Some(6));
}

#[test]
fn minimum_cash_is_the_capital_requirement() {
    let result = project(&preset(ScenarioPreset::Moderate));
    let lowest = result
        .months
        .iter()
        .min_by(|a, b| a.cumulative_cash.total_cmp(&b.cumulative_cash))
        .expect("non-empty horizon");

    assert_eq!(result.kpis.minimum_cash, lowest.cumulative_cash);
    assert_eq!(result.kpis.minimum_cash_month, lowest.month);
    assert!(result.kpis.minimum_cash < 0.0, "Moderate dips below zero before breakeven");
}

// ── Determinism ──────────────────────────────────────────────────────────────

/// Same inputs, same output. The engine holds no state between calls.
#[test]
fn projection_is_idempotent() {
    for scenario in ScenarioPreset::ALL {
        let inputs = preset(scenario);
        let a = project(&inputs);
        let b = project(&inputs);
        assert_eq!(a, b, "{scenario:?} produced different results on a second run");
    }
}

// ── Events ───────────────────────────────────────────────────────────────────

#[test]
fn events_bracket_the_run() {
    let result = project(&lean());
    let names: Vec<&str> = result.events.iter().map(|e| e.type_name()).collect();

    assert_eq!(names.first(), Some(&"projection_started"));
    assert_eq!(names.last(), Some(&"projection_completed"));
    assert_eq!(names.iter().filter(|n| **n == "launch_reached").count(), 1);

    let launch = result
        .events
        .iter()
        .find_map(|e| match e {
            ProjectionEvent::LaunchReached { month, mrr, .. } => Some((*month, *mrr)),
            _ => None,
        })
        .expect("launch_reached event");
    assert_eq!(launch, (7, result.kpis.launch_mrr));
}

#[test]
fn events_record_stream_activation_and_lease() {
    let mut inputs = lean();
    inputs.diagnostics_enabled = true;
    inputs.diagnostics_start_month = 6;
    inputs.equipment_lease_monthly = 5_000.0;
    let result = project(&inputs);

    let activations: Vec<(u32, RevenueStream)> = result
        .events
        .iter()
        .filter_map(|e| match e {
            ProjectionEvent::StreamActivated { month, stream } => Some((*month, *stream)),
            _ => None,
        })
        .collect();
    assert_eq!(
        activations,
        vec![
            (0, RevenueStream::Primary),
            (0, RevenueStream::Specialty),
            (6, RevenueStream::Echo),
            (6, RevenueStream::Ct),
            (6, RevenueStream::Labs),
        ]
    );

    assert!(result.events.iter().any(|e| matches!(
        e,
        ProjectionEvent::EquipmentLeaseStarted { month: 6, .. }
    )));
}

#[test]
fn result_tree_serializes_with_tagged_events() {
    let result = project(&lean());
    let json = serde_json::to_value(&result).expect("serialize result");

    assert_eq!(json["months"].as_array().map(Vec::len), Some(19));
    assert_eq!(json["months"][0]["phase"], "ramp");
    assert_eq!(json["months"][7]["phase"], "post_launch");
    assert_eq!(json["events"][0]["type"], "projection_started");
    assert!(json["kpis"]["breakeven_month"].is_null());
}
