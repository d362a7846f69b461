//! Physician ROI split by class.
//!
//! Separate from the month loop: reads one reference month's record and
//! applies each class's fixed fee/equity terms.

use crate::{
    derived::{DerivedVariables, PhysicianClass},
    projection::MonthlyProjection,
    types::{Dollars, Month},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicianClassMetrics {
    pub class:              PhysicianClass,
    pub headcount:          u32,
    pub investment:         Dollars,
    pub equity_stake:       f64,
    pub service_fee:        f64,
    /// Specialty revenue attributed to one physician at the reference month.
    pub specialty_revenue:  Dollars,
    pub specialty_retained: Dollars,
    pub equity_income:      Dollars,
    pub monthly_income:     Dollars,
    pub annualized_income:  Dollars,
    /// `None` when investment is zero; shown as "N/A".
    pub roi_pct:            Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysicianMetrics {
    pub reference_month: Month,
    pub mso_net_profit:  Dollars,
    pub founding:        PhysicianClassMetrics,
    pub additional:      PhysicianClassMetrics,
}

impl PhysicianMetrics {
    pub fn class(&self, class: PhysicianClass) -> &PhysicianClassMetrics {
        match class {
            PhysicianClass::Founding   => &self.founding,
            PhysicianClass::Additional => &self.additional,
        }
    }
}

/// The reference month is clamped to the last simulated month.
pub fn physician_metrics(
    derived: &DerivedVariables,
    months: &[MonthlyProjection],
    reference_month: Month,
) -> PhysicianMetrics {
    let reference = months
        .get(reference_month as usize)
        .or(months.last());

    let (reference_month, mso_net_profit, specialty_total) = match reference {
        Some(r) => (r.month, r.profit, r.revenue.specialty),
        None => (0, 0.0, 0.0),
    };

    let specialty_per_physician = if derived.total_physicians > 0 {
        specialty_total / derived.total_physicians as f64
    } else {
        0.0
    };

    let class_metrics = |class: PhysicianClass| {
        let terms = derived.terms(class);
        let specialty_retained = specialty_per_physician * (1.0 - terms.service_fee);
        let equity_income = mso_net_profit * terms.equity_stake;
        let monthly_income = specialty_retained + equity_income;
        let annualized_income = monthly_income * 12.0;
        let roi_pct = if terms.investment > 0.0 {
            Some(annualized_income / terms.investment * 100.0)
        } else {
            None
        };

        PhysicianClassMetrics {
            class,
            headcount: derived.headcount(class),
            investment: terms.investment,
            equity_stake: terms.equity_stake,
            service_fee: terms.service_fee,
            specialty_revenue: specialty_per_physician,
            specialty_retained,
            equity_income,
            monthly_income,
            annualized_income,
            roi_pct,
        }
    };

    PhysicianMetrics {
        reference_month,
        mso_net_profit,
        founding: class_metrics(PhysicianClass::Founding),
        additional: class_metrics(PhysicianClass::Additional),
    }
}
