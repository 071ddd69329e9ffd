use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid months remaining {0}: at most 11 months of a fiscal year can be projected")]
    InvalidMonthsRemaining(u32),

    #[error("Target coefficient must not equal 1: the projection denominator (1 - coefficient) vanishes")]
    DivisionByTargetCoefficient,

    #[error("Projection produced a non-finite value: {0}")]
    NonFiniteProjection(String),

    #[error("Source is missing required columns {missing:?}; found columns: {found:?}")]
    MissingRequiredColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("No months left to project for entity '{0}'")]
    EmptyProjectionWindow(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Entity '{name}' stores {stored} months remaining but its current month implies {derived}")]
    InconsistentRemainingMonths {
        name: String,
        stored: u32,
        derived: u32,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
