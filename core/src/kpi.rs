//! KPI aggregation over a completed month sequence.
//!
//! Runs after the month loop. Launch KPIs are read from the launch
//! snapshot, never recomputed.

use crate::{
    projection::{LaunchState, MonthlyProjection},
    types::{Dollars, Month},
};
use serde::{Deserialize, Serialize};

/// The post-launch KPI window: `[launch_month, launch_month + projection_months)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiWindow {
    pub launch_month:      Month,
    pub projection_months: Month,
}

impl KpiWindow {
    pub fn contains(&self, month: Month) -> bool {
        month >= self.launch_month
            && month < self.launch_month.saturating_add(self.projection_months)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiSummary {
    /// Net cash consumed over the ramp months (−Σ profit). Negative if the
    /// ramp was profitable.
    pub total_ramp_burn:    Dollars,
    pub launch_mrr:         Dollars,
    pub members_at_launch:  f64,
    pub cash_at_launch:     Dollars,
    pub total_revenue_12mo: Dollars,
    pub total_profit_12mo:  Dollars,
    pub peak_members:       f64,
    /// First month with cumulative cash ≥ 0. `None` if never reached.
    pub breakeven_month:    Option<Month>,
    /// Lowest cumulative cash position: the capital the launch needs.
    pub minimum_cash:       Dollars,
    pub minimum_cash_month: Month,
    pub ending_cash:        Dollars,
}

pub fn summarize(
    months: &[MonthlyProjection],
    launch: &LaunchState,
    window: KpiWindow,
) -> KpiSummary {
    let total_ramp_burn = -months
        .iter()
        .filter(|m| m.month < window.launch_month)
        .map(|m| m.profit)
        .sum::<f64>();

    let (total_revenue_12mo, total_profit_12mo) = months
        .iter()
        .filter(|m| window.contains(m.month))
        .fold((0.0, 0.0), |(rev, profit), m| {
            (rev + m.revenue.total, profit + m.profit)
        });

    let peak_members = months
        .iter()
        .map(|m| m.members.primary_active)
        .fold(0.0, f64::max);

    let breakeven_month = breakeven_month(months);

    let (minimum_cash_month, minimum_cash) = months
        .iter()
        .map(|m| (m.month, m.cumulative_cash))
        .reduce(|lowest, next| if next.1 < lowest.1 { next } else { lowest })
        .unwrap_or((0, 0.0));

    KpiSummary {
        total_ramp_burn,
        launch_mrr: launch.record.revenue.total,
        members_at_launch: launch.record.members.primary_active,
        cash_at_launch: launch.record.cumulative_cash,
        total_revenue_12mo,
        total_profit_12mo,
        peak_members,
        breakeven_month,
        minimum_cash,
        minimum_cash_month,
        ending_cash: months.last().map(|m| m.cumulative_cash).unwrap_or(0.0),
    }
}

/// Lowest month index whose cumulative cash is non-negative.
pub fn breakeven_month(months: &[MonthlyProjection]) -> Option<Month> {
    months
        .iter()
        .find(|m| m.cumulative_cash >= 0.0)
        .map(|m| m.month)
}
