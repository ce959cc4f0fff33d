use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Judgment service error: {0}")]
    Service(String),

    #[error("Malformed judgment response: {0}")]
    InvalidResponse(String),

    #[error("Judgment service timed out after {0}ms")]
    Timeout(u64),
}

pub type ScorerResult<T> = Result<T, ScorerError>;
