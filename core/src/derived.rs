//! Values derived directly from the Input Model, with no time axis.

use crate::{inputs::ProjectionInputs, types::Dollars};
use serde::{Deserialize, Serialize};

/// Physician tiers. Each class carries fixed terms; the two tiers are a
/// lookup, never interpolated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhysicianClass {
    Founding,
    Additional,
}

impl PhysicianClass {
    pub const ALL: [PhysicianClass; 2] = [PhysicianClass::Founding, PhysicianClass::Additional];

    /// Capital contributed per physician.
    pub fn investment(self) -> Dollars {
        match self {
            PhysicianClass::Founding   => 600_000.0,
            PhysicianClass::Additional => 750_000.0,
        }
    }

    /// Share of MSO net profit distributed to each physician.
    pub fn equity_stake(self) -> f64 {
        match self {
            PhysicianClass::Founding   => 0.10,
            PhysicianClass::Additional => 0.05,
        }
    }

    /// Share of the physician's specialty revenue kept by the MSO.
    pub fn service_fee(self) -> f64 {
        match self {
            PhysicianClass::Founding   => 0.30,
            PhysicianClass::Additional => 0.40,
        }
    }

    pub fn terms(self) -> PhysicianTerms {
        PhysicianTerms {
            class:        self,
            investment:   self.investment(),
            equity_stake: self.equity_stake(),
            service_fee:  self.service_fee(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PhysicianTerms {
    pub class:        PhysicianClass,
    pub investment:   Dollars,
    pub equity_stake: f64,
    pub service_fee:  f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedVariables {
    pub founding_physicians:   u32,
    pub additional_physicians: u32,
    pub total_physicians:      u32,
    pub physician_capital:     Dollars,
    pub founding_terms:        PhysicianTerms,
    pub additional_terms:      PhysicianTerms,
}

impl DerivedVariables {
    pub fn headcount(&self, class: PhysicianClass) -> u32 {
        match class {
            PhysicianClass::Founding   => self.founding_physicians,
            PhysicianClass::Additional => self.additional_physicians,
        }
    }

    pub fn terms(&self, class: PhysicianClass) -> PhysicianTerms {
        match class {
            PhysicianClass::Founding   => self.founding_terms,
            PhysicianClass::Additional => self.additional_terms,
        }
    }
}

pub fn derive(inputs: &ProjectionInputs) -> DerivedVariables {
    let founding = u32::from(inputs.founding_physician);
    let additional = inputs.additional_physicians;

    let physician_capital = founding as f64 * PhysicianClass::Founding.investment()
        + additional as f64 * PhysicianClass::Additional.investment();

    DerivedVariables {
        founding_physicians:   founding,
        additional_physicians: additional,
        total_physicians:      founding.saturating_add(additional),
        physician_capital,
        founding_terms:        PhysicianClass::Founding.terms(),
        additional_terms:      PhysicianClass::Additional.terms(),
    }
}
