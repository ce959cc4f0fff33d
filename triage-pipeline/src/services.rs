use async_trait::async_trait;
use thiserror::Error;
use triage_types::{AuditRecord, Transcription};

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("transcription service not configured")]
    NotConfigured,

    #[error("audio could not be processed: {0}")]
    AudioProcessing(String),

    #[error("{0}")]
    Service(String),
}

/// Capability interface over the external speech-to-text service.
///
/// Transcription output is untrusted input: the orchestrator checks the
/// returned confidence and the downstream stages re-validate everything
/// derived from the text.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(
        &self,
        audio_ref: &str,
        language_hint: &str,
    ) -> Result<Transcription, TranscriptionError>;
}

/// Delivery receipt from the alert transport.
#[derive(Debug, Clone)]
pub struct AlertReceipt {
    pub success: bool,
    pub delivery_id: Option<String>,
}

/// Capability interface over the SMS/push alert transport.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, contact: &str, message: &str) -> AlertReceipt;
}

/// Capability interface over the audit trail store. Records are
/// append-only; within one case they arrive in causal order because the
/// pipeline is strictly sequential.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord);
}
