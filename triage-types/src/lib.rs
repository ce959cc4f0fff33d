//! Shared data model for the VHT Co-Pilot triage pipeline
//!
//! Every stage of the pipeline communicates through the immutable types in
//! this crate. Data flows strictly forward: a stage consumes the records
//! produced upstream and never hands anything back. The only value that is
//! ever rewritten after creation is a [`TriageJudgment`] score, and only by
//! the safety validator's override applied in the orchestrator.
//!
//! All types serialize with serde because [`CaseResult`] is the boundary
//! contract handed to any caller (CLI, service endpoint, batch job).

pub mod audit;
pub mod case;
pub mod guideline;
pub mod hospital;
pub mod judgment;
pub mod referral;
pub mod result;
pub mod symptom;
pub mod validation;

pub use audit::*;
pub use case::*;
pub use guideline::*;
pub use hospital::*;
pub use judgment::*;
pub use referral::*;
pub use result::*;
pub use symptom::*;
pub use validation::*;
