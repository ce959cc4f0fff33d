//! Case processing orchestrator for the VHT Co-Pilot triage engine
//!
//! Sequences the full decision pipeline over one case report:
//!
//! 1. Audio transcription (optional, via [`TranscriptionService`])
//! 2. Symptom extraction, normalization and categorization
//! 3. Clinical guideline context retrieval
//! 4. Scored triage judgment
//! 5. Independent safety validation with score override
//! 6. Deterministic emergency gate (score, confidence, validation)
//! 7. Patient triage classification
//! 8. Hospital assignment, referral and alert when the gate fires
//! 9. Audit trail record
//! 10. Elapsed-time accounting
//!
//! Stages pass immutable data strictly forward and degrade individually;
//! the orchestrator converts the few genuinely fatal conditions (missing
//! input, transcription failure, case timeout) into a structured
//! [`triage_types::CaseResult`] with `success = false`. Nothing ever
//! escapes [`TriagePipeline::process_case`] as an error.

pub mod alert;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod sinks;

pub use alert::*;
pub use config::*;
pub use error::*;
pub use pipeline::*;
pub use services::*;
pub use sinks::*;
