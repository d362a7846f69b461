use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Field '{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min:   f64,
        max:   f64,
    },

    #[error("Unknown preset '{key}'")]
    UnknownPreset { key: String },

    #[error("Invalid scenario name '{name}'")]
    InvalidScenarioName { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ProjResult<T> = Result<T, ProjectionError>;
