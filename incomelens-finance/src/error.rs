use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("Invalid grouping pattern: {0}")]
    Pattern(#[from] regex::Error),
}
