//! Triage scoring for the VHT pipeline
//!
//! Produces a structured [`triage_types::TriageJudgment`] from normalized
//! symptoms, patient demographics and retrieved guideline context. The
//! backing judgment service (an LLM behind [`JudgmentService`]) is optional
//! configuration: when absent, a deterministic rule-based fallback keeps the
//! pipeline functional, and when the service errors the scorer degrades to a
//! minimum-confidence mid-score judgment instead of failing the case.

pub mod config;
pub mod error;
pub mod prompt;
pub mod scorer;
pub mod service;

pub use config::*;
pub use error::*;
pub use prompt::*;
pub use scorer::*;
pub use service::*;
