//! The result tree returned by one simulator call.
//!
//! Records are created once per month and never mutated afterwards.

use crate::{
    derived::DerivedVariables,
    event::ProjectionEvent,
    inputs::RevenueStream,
    kpi::KpiSummary,
    physician::PhysicianMetrics,
    types::{Dollars, Month},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ramp,
    PostLaunch,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Members {
    pub primary_active:    f64,
    pub primary_added:     f64,
    pub primary_churned:   f64,
    pub specialty_active:  f64,
    pub specialty_added:   f64,
    pub specialty_churned: f64,
    pub corporate_covered: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RevenueBreakdown {
    pub primary:   Dollars,
    pub specialty: Dollars,
    pub corporate: Dollars,
    pub echo:      Dollars,
    pub ct:        Dollars,
    pub labs:      Dollars,
    pub total:     Dollars,
}

impl RevenueBreakdown {
    pub fn stream(&self, stream: RevenueStream) -> Dollars {
        match stream {
            RevenueStream::Primary   => self.primary,
            RevenueStream::Specialty => self.specialty,
            RevenueStream::Corporate => self.corporate,
            RevenueStream::Echo      => self.echo,
            RevenueStream::Ct        => self.ct,
            RevenueStream::Labs      => self.labs,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CostBreakdown {
    pub salaries:        Dollars,
    pub fixed_overhead:  Dollars,
    pub variable:        Dollars,
    pub equipment_lease: Dollars,
    pub total:           Dollars,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyProjection {
    pub month:           Month,
    pub phase:           Phase,
    pub members:         Members,
    pub revenue:         RevenueBreakdown,
    pub costs:           CostBreakdown,
    /// revenue.total − costs.total for this month alone.
    pub profit:          Dollars,
    /// Running sum of profit on top of starting capital. May be negative.
    pub cumulative_cash: Dollars,
    pub headcount:       u32,
}

/// The launch-month record, verbatim, with what was running at that point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchState {
    pub record:          MonthlyProjection,
    pub active_services: Vec<RevenueStream>,
    pub team_headcount:  u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionResult {
    pub months:     Vec<MonthlyProjection>,
    pub launch:     LaunchState,
    pub kpis:       KpiSummary,
    pub physicians: PhysicianMetrics,
    pub derived:    DerivedVariables,
    pub events:     Vec<ProjectionEvent>,
}

impl ProjectionResult {
    pub fn month(&self, month: Month) -> Option<&MonthlyProjection> {
        self.months.get(month as usize)
    }
}
