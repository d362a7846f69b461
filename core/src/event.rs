//! Milestones recorded during one projection run.
//!
//! The log is part of the result tree: the simulator performs no I/O, so
//! anything worth reporting about a run is returned here.

use crate::{
    inputs::RevenueStream,
    types::{Dollars, Month},
};
use serde::{Deserialize, Serialize};

/// Variants are appended, never reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionEvent {
    ProjectionStarted {
        months:       Month,
        launch_month: Month,
        growth_curve: String,
    },
    StreamActivated {
        month:  Month,
        stream: RevenueStream,
    },
    EquipmentLeaseStarted {
        month:   Month,
        monthly: Dollars,
    },
    LaunchReached {
        month:           Month,
        primary_members: f64,
        mrr:             Dollars,
        cumulative_cash: Dollars,
    },
    ProjectionCompleted {
        months:          Month,
        breakeven_month: Option<Month>,
    },
}

impl ProjectionEvent {
    /// Stable name for logs and tooling.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProjectionEvent::ProjectionStarted { .. }     => "projection_started",
            ProjectionEvent::StreamActivated { .. }       => "stream_activated",
            ProjectionEvent::EquipmentLeaseStarted { .. } => "equipment_lease_started",
            ProjectionEvent::LaunchReached { .. }         => "launch_reached",
            ProjectionEvent::ProjectionCompleted { .. }   => "projection_completed",
        }
    }
}
