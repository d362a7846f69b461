//! Growth-curve strategies.
//!
//! Each strategy maps a month to a multiplier on the base intake
//! (intake per physician × physicians). The strategy is chosen once per
//! run from `GrowthCurve` and never re-dispatched mid-run.

use crate::{
    inputs::{GrowthCurve, ProjectionInputs},
    types::Month,
};

pub trait GrowthStrategy: Send + Sync {
    /// Stable name, used in logs and events.
    fn name(&self) -> &'static str;

    /// Intake multiplier for `month`. Never negative.
    fn multiplier(&self, month: Month) -> f64;
}

/// Constant intake every month.
pub struct LinearGrowth;

impl GrowthStrategy for LinearGrowth {
    fn name(&self) -> &'static str { "linear" }

    fn multiplier(&self, _month: Month) -> f64 { 1.0 }
}

/// Logistic intake peaking at mid-horizon. Cumulative intake over the
/// horizon is close to the linear curve's; past the horizon intake tapers
/// off and membership saturates.
pub struct SCurveGrowth {
    horizon:   f64,
    steepness: f64,
}

impl SCurveGrowth {
    pub fn new(horizon_months: Month) -> Self {
        let horizon = horizon_months as f64;
        Self {
            horizon,
            steepness: 8.0 / horizon,
        }
    }

    fn logistic(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-self.steepness * (x - self.horizon / 2.0)).exp())
    }
}

impl GrowthStrategy for SCurveGrowth {
    fn name(&self) -> &'static str { "s_curve" }

    fn multiplier(&self, month: Month) -> f64 {
        let m = month as f64;
        (self.horizon * (self.logistic(m + 1.0) - self.logistic(m))).max(0.0)
    }
}

/// Intake compounds by a fixed monthly percentage until the horizon, then
/// holds at the horizon's level.
pub struct ExponentialGrowth {
    monthly_rate: f64,
    horizon:      Month,
}

impl ExponentialGrowth {
    pub fn new(monthly_rate_pct: f64, horizon_months: Month) -> Self {
        Self {
            monthly_rate: (monthly_rate_pct / 100.0).max(0.0),
            horizon:      horizon_months,
        }
    }
}

impl GrowthStrategy for ExponentialGrowth {
    fn name(&self) -> &'static str { "exponential" }

    fn multiplier(&self, month: Month) -> f64 {
        let exponent = month.min(self.horizon) as i32;
        (1.0 + self.monthly_rate).powi(exponent)
    }
}

impl GrowthCurve {
    /// Select the strategy for one run.
    /// A zero-length horizon has no shape, so the s-curve degrades to linear.
    pub fn strategy(self, inputs: &ProjectionInputs) -> Box<dyn GrowthStrategy> {
        match self {
            GrowthCurve::Linear => Box::new(LinearGrowth),
            GrowthCurve::SCurve if inputs.growth_horizon_months == 0 => Box::new(LinearGrowth),
            GrowthCurve::SCurve => Box::new(SCurveGrowth::new(inputs.growth_horizon_months)),
            GrowthCurve::Exponential => Box::new(ExponentialGrowth::new(
                inputs.exponential_growth_pct,
                inputs.growth_horizon_months,
            )),
        }
    }
}
