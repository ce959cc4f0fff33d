use crate::{
    ReferralOutcome, SymptomCategory, SymptomRecord, TriageJudgment, TriageLevel,
    ValidationOutcome,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Disclaimer attached verbatim to every case result.
pub const DISCLAIMER: &str = "Guidance based on Uganda MoH Clinical Guidelines. \
Not a final diagnosis. VHT should use clinical judgment.";

/// Transcription of an audio case report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub detected_language: String,
    pub confidence: f32,
    pub duration_seconds: f64,
}

/// Stages of the case state machine. The final stage reached is recorded in
/// the result so a reviewer can see how far a failed case progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Received,
    Transcribed,
    Normalized,
    ContextRetrieved,
    Scored,
    Validated,
    Gated,
    Referred,
    Audited,
    Completed,
    Failed,
}

/// The single structured result every caller of the pipeline receives.
///
/// This is the boundary contract: failures surface here as `success =
/// false` with a human-readable `error`, never as a raised error or a
/// partial panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: Uuid,
    pub success: bool,
    pub error: Option<String>,
    /// Non-fatal issues attached along the way (low transcription
    /// confidence, validation override notes).
    pub warnings: Vec<String>,
    pub stage: PipelineStage,
    pub transcription: Option<Transcription>,
    pub symptoms_raw: Vec<String>,
    pub symptoms: Vec<SymptomRecord>,
    pub symptom_categories: BTreeMap<SymptomCategory, Vec<String>>,
    pub judgment: Option<TriageJudgment>,
    pub validation: Option<ValidationOutcome>,
    /// Result of the emergency gate, recomputed by the orchestrator.
    pub emergency: bool,
    pub triage_level: Option<TriageLevel>,
    pub referral: Option<ReferralOutcome>,
    pub alert_sent: bool,
    pub elapsed_seconds: f64,
    pub disclaimer: String,
}

impl CaseResult {
    /// Empty result skeleton for a freshly received case.
    pub fn received(case_id: Uuid) -> Self {
        Self {
            case_id,
            success: false,
            error: None,
            warnings: Vec::new(),
            stage: PipelineStage::Received,
            transcription: None,
            symptoms_raw: Vec::new(),
            symptoms: Vec::new(),
            symptom_categories: BTreeMap::new(),
            judgment: None,
            validation: None,
            emergency: false,
            triage_level: None,
            referral: None,
            alert_sent: false,
            elapsed_seconds: 0.0,
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    /// Mark the case failed with the first error encountered.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.success = false;
        self.stage = PipelineStage::Failed;
        if self.error.is_none() {
            self.error = Some(reason.into());
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
