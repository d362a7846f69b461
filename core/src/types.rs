//! Shared primitive types used across the projection engine.

/// A projection month. Month 0 is the first month of the ramp.
pub type Month = u32;

/// US dollars. All money in the engine is carried as f64 dollars.
pub type Dollars = f64;

/// A normalized scenario name (lowercase, hyphen-separated).
pub type ScenarioName = String;
