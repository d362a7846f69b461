//! The projection engine: one continuous month loop.
//!
//! PER-MONTH ORDER (fixed, never reordered):
//!   1. Growth    (curve multiplier × intake × physicians; carryover at month 0)
//!   2. Churn     (on the post-growth count; annual % / 12)
//!   3. Revenue   (each stream gated by flag and start month)
//!   4. Revenue total
//!   5. Costs     (salaries, fixed overhead, variable, equipment lease)
//!   6. Profit
//!   7. Cumulative cash
//!
//! RULES:
//!   - Ramp and post-launch share one loop. Accumulators never reset.
//!   - The phase tag only drives KPI windows and the launch snapshot.
//!   - No randomness, no I/O, no clock reads. Same input, same output.
//!   - KPIs are computed after the loop, never inside it.

use crate::{
    derived::{derive, DerivedVariables},
    event::ProjectionEvent,
    growth::GrowthStrategy,
    inputs::{ProjectionInputs, RevenueStream},
    kpi::{summarize, KpiWindow},
    physician::physician_metrics,
    projection::{
        CostBreakdown, LaunchState, Members, MonthlyProjection, Phase, ProjectionResult,
        RevenueBreakdown,
    },
    types::{Dollars, Month},
};

/// Run the full horizon for `inputs` and return a fresh result tree.
pub fn project(inputs: &ProjectionInputs) -> ProjectionResult {
    ProjectionEngine::new(inputs).run()
}

/// Members churned per month as a fraction of the post-growth count.
/// Linear approximation of the annual rate.
pub fn monthly_churn_rate(annual_churn_pct: f64) -> f64 {
    finite_or_zero(annual_churn_pct / 100.0 / 12.0).max(0.0)
}

pub struct ProjectionEngine<'a> {
    inputs:       &'a ProjectionInputs,
    derived:      DerivedVariables,
    growth:       Box<dyn GrowthStrategy>,
    launch_month: Month,
    months:       Month,
}

#[derive(Debug, Clone, Copy)]
struct PopulationStep {
    added:   f64,
    churned: f64,
    active:  f64,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(inputs: &'a ProjectionInputs) -> Self {
        let launch_month = inputs.ramp_months;
        // Always simulate through the launch month, even for a zero-length
        // post-launch window.
        let months = launch_month
            .saturating_add(inputs.projection_months)
            .max(launch_month.saturating_add(1));

        Self {
            inputs,
            derived: derive(inputs),
            growth: inputs.growth_curve.strategy(inputs),
            launch_month,
            months,
        }
    }

    pub fn phase_of(&self, month: Month) -> Phase {
        if month < self.launch_month {
            Phase::Ramp
        } else {
            Phase::PostLaunch
        }
    }

    pub fn run(&self) -> ProjectionResult {
        let mut events = vec![ProjectionEvent::ProjectionStarted {
            months:       self.months,
            launch_month: self.launch_month,
            growth_curve: self.growth.name().to_string(),
        }];

        let mut records: Vec<MonthlyProjection> = Vec::with_capacity(self.months as usize);
        for month in 0..self.months {
            let record = self.step(month, records.last());
            self.record_milestones(&record, &mut events);

            log::debug!(
                "month={month} {:?}: primary={:.1} specialty={:.1} revenue=${:.0} costs=${:.0} profit=${:.0} cash=${:.0}",
                record.phase,
                record.members.primary_active,
                record.members.specialty_active,
                record.revenue.total,
                record.costs.total,
                record.profit,
                record.cumulative_cash,
            );

            records.push(record);
        }

        let launch = self.capture_launch(&records);
        let kpis = summarize(
            &records,
            &launch,
            KpiWindow {
                launch_month:      self.launch_month,
                projection_months: self.inputs.projection_months,
            },
        );
        let physicians =
            physician_metrics(&self.derived, &records, self.inputs.roi_reference_month);

        events.push(ProjectionEvent::ProjectionCompleted {
            months:          self.months,
            breakeven_month: kpis.breakeven_month,
        });

        log::info!(
            "projection: {} months, launch MRR=${:.0}, 12mo revenue=${:.0}, 12mo profit=${:.0}, breakeven={}",
            self.months,
            kpis.launch_mrr,
            kpis.total_revenue_12mo,
            kpis.total_profit_12mo,
            kpis.breakeven_month
                .map(|m| format!("month {m}"))
                .unwrap_or_else(|| "not reached".into()),
        );

        ProjectionResult {
            months: records,
            launch,
            kpis,
            physicians,
            derived: self.derived.clone(),
            events,
        }
    }

    /// Build one month's record from the previous one.
    fn step(&self, month: Month, prev: Option<&MonthlyProjection>) -> MonthlyProjection {
        let inputs = self.inputs;
        let physicians = self.derived.total_physicians as f64;

        let (prev_primary, prev_specialty, prev_cash) = match prev {
            Some(p) => (
                p.members.primary_active,
                p.members.specialty_active,
                p.cumulative_cash,
            ),
            None => (0.0, 0.0, finite_or_zero(inputs.starting_capital)),
        };

        // ── 1–2. Growth, then churn ───────────────────────────
        let multiplier = finite_or_zero(self.growth.multiplier(month));
        let mut primary_added = inputs.primary_intake_per_physician * physicians * multiplier;
        let mut specialty_added = inputs.specialty_intake_per_physician * physicians * multiplier;
        if month == 0 {
            primary_added += inputs.primary_carryover_per_physician * physicians;
            specialty_added += inputs.specialty_carryover_per_physician * physicians;
        }

        let primary = advance_population(prev_primary, primary_added, inputs.primary_churn_annual_pct);
        let specialty =
            advance_population(prev_specialty, specialty_added, inputs.specialty_churn_annual_pct);

        let corporate_gate = inputs.gate(RevenueStream::Corporate);
        let corporate_covered = finite_or_zero(
            inputs.corporate_contracts_per_month
                * corporate_gate.months_open(month) as f64
                * inputs.employees_per_contract,
        )
        .max(0.0);

        let members = Members {
            primary_active:    primary.active,
            primary_added:     primary.added,
            primary_churned:   primary.churned,
            specialty_active:  specialty.active,
            specialty_added:   specialty.added,
            specialty_churned: specialty.churned,
            corporate_covered,
        };

        // ── 3–4. Revenue ──────────────────────────────────────
        let revenue = self.revenue(month, &members);

        // ── 5. Costs ──────────────────────────────────────────
        let costs = self.costs(month, revenue.total);

        // ── 6–7. Profit and cash ──────────────────────────────
        let profit = revenue.total - costs.total;

        MonthlyProjection {
            month,
            phase: self.phase_of(month),
            members,
            revenue,
            costs,
            profit,
            cumulative_cash: prev_cash + profit,
            headcount: self.headcount(month),
        }
    }

    fn revenue(&self, month: Month, members: &Members) -> RevenueBreakdown {
        let inputs = self.inputs;
        let gated = |stream: RevenueStream, amount: Dollars| -> Dollars {
            if inputs.gate(stream).is_open(month) {
                finite_or_zero(amount)
            } else {
                0.0
            }
        };

        let eligible = members.primary_active + members.specialty_active;
        let diagnostic = |stream: RevenueStream| -> Dollars {
            let (price, utilization) = inputs.diagnostic_pricing(stream);
            gated(stream, eligible * price * utilization)
        };

        let primary = gated(RevenueStream::Primary, members.primary_active * inputs.primary_price);
        let specialty = gated(
            RevenueStream::Specialty,
            members.specialty_active * inputs.specialty_price,
        );
        let corporate = gated(
            RevenueStream::Corporate,
            members.corporate_covered * inputs.corporate_price_per_employee,
        );
        let echo = diagnostic(RevenueStream::Echo);
        let ct = diagnostic(RevenueStream::Ct);
        let labs = diagnostic(RevenueStream::Labs);

        RevenueBreakdown {
            primary,
            specialty,
            corporate,
            echo,
            ct,
            labs,
            total: primary + specialty + corporate + echo + ct + labs,
        }
    }

    fn costs(&self, month: Month, revenue_total: Dollars) -> CostBreakdown {
        let inputs = self.inputs;

        let salaries: Dollars = inputs
            .staff_roles()
            .iter()
            .filter(|role| role.on_payroll(month))
            .map(|role| finite_or_zero(role.count as f64 * role.annual_salary / 12.0))
            .sum();

        let fixed_overhead =
            finite_or_zero(inputs.fixed_overhead_monthly + inputs.marketing_monthly);
        let variable = finite_or_zero(revenue_total * inputs.variable_cost_pct / 100.0);

        // The only cost that depends on the month: zero until the equipment
        // gate opens, flat afterwards.
        let equipment_lease = if inputs.equipment_gate().is_open(month) {
            finite_or_zero(inputs.equipment_lease_monthly)
        } else {
            0.0
        };

        CostBreakdown {
            salaries,
            fixed_overhead,
            variable,
            equipment_lease,
            total: salaries + fixed_overhead + variable + equipment_lease,
        }
    }

    /// Physicians plus staff on payroll this month.
    fn headcount(&self, month: Month) -> u32 {
        self.inputs
            .staff_roles()
            .iter()
            .filter(|role| role.on_payroll(month))
            .fold(self.derived.total_physicians, |acc, role| acc.saturating_add(role.count))
    }

    fn record_milestones(&self, record: &MonthlyProjection, events: &mut Vec<ProjectionEvent>) {
        let month = record.month;

        for stream in RevenueStream::ALL {
            if self.inputs.gate(stream).opens_at(month) {
                events.push(ProjectionEvent::StreamActivated { month, stream });
            }
        }

        if self.inputs.equipment_gate().opens_at(month) && record.costs.equipment_lease > 0.0 {
            events.push(ProjectionEvent::EquipmentLeaseStarted {
                month,
                monthly: record.costs.equipment_lease,
            });
        }

        if month == self.launch_month {
            events.push(ProjectionEvent::LaunchReached {
                month,
                primary_members: record.members.primary_active,
                mrr:             record.revenue.total,
                cumulative_cash: record.cumulative_cash,
            });
        }
    }

    /// The Launch State is the record of month `ramp_months`: the month after
    /// the last ramp-tagged month, itself tagged `PostLaunch`. It closes the
    /// ramp and opens the KPI window.
    fn capture_launch(&self, records: &[MonthlyProjection]) -> LaunchState {
        // `new` sets `months > launch_month`, so the launch record exists.
        let record = records[self.launch_month as usize].clone();

        let active_services = RevenueStream::ALL
            .into_iter()
            .filter(|s| self.inputs.gate(*s).is_open(record.month))
            .collect();

        LaunchState {
            team_headcount: record.headcount,
            active_services,
            record,
        }
    }
}

/// Growth then churn for one population. Clamped at zero.
fn advance_population(previous: f64, added: f64, annual_churn_pct: f64) -> PopulationStep {
    let added = finite_or_zero(added).max(0.0);
    let grown = previous.max(0.0) + added;
    let churned = (grown * monthly_churn_rate(annual_churn_pct)).clamp(0.0, grown);
    PopulationStep {
        added,
        churned,
        active: (grown - churned).max(0.0),
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
