//! MSO launch projection engine.
//!
//! `engine::project` turns one `ProjectionInputs` into a month-by-month
//! projection with launch KPIs and physician ROI. Everything else in the
//! crate (presets, edits, stores) sits around that pure function.

pub mod command;
pub mod config;
pub mod derived;
pub mod engine;
pub mod error;
pub mod event;
pub mod fields;
pub mod formulas;
pub mod growth;
pub mod inputs;
pub mod kpi;
pub mod physician;
pub mod projection;
pub mod snapshot;
pub mod store;
pub mod types;

pub use engine::project;
pub use error::{ProjResult, ProjectionError};
pub use inputs::ProjectionInputs;
pub use projection::ProjectionResult;
