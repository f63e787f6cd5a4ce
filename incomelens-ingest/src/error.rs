use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Neither the current provider envelope nor the legacy report shape.
    /// An upstream contract break, never an empty report.
    #[error("Unrecognized snapshot schema: expected `date_range.start` (current) or `total_income_12mo` (legacy)")]
    UnknownSchema,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
