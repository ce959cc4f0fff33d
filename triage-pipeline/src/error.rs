use thiserror::Error;

/// Case-fatal conditions, used for internal signaling only.
///
/// The public pipeline API never returns these: they are converted into a
/// structured result with `success = false` and a human-readable error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing case input: {0}")]
    MissingInput(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Timeout: case processing exceeded {0}ms")]
    Timeout(u64),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
