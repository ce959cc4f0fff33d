use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};
use triage_types::{
    ContextSnippet, RiskFlag, TriageJudgment, ValidationOutcome, SCORE_MAX, SCORE_MIN,
};

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Validation service error: {0}")]
    Service(String),
}

/// Capability interface over a stronger (model-backed) validation service.
///
/// Optional: when unconfigured, the rule-based validator below runs
/// instead, and when the service errors the validator falls back to a
/// conservative failure outcome rather than raising.
#[async_trait]
pub trait ValidationService: Send + Sync {
    async fn validate(
        &self,
        judgment: &TriageJudgment,
        symptoms: &[String],
        context: &[ContextSnippet],
    ) -> Result<ValidationOutcome, ValidatorError>;
}

/// Safety validator thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Minimum score required to support an emergency flag.
    pub emergency_score_threshold: i32,
    /// Minimum confidence required to support an emergency flag.
    pub emergency_confidence_threshold: f32,
    /// Below this confidence a passing judgment still gets a human-review
    /// advisory note.
    pub review_confidence_threshold: f32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            emergency_score_threshold: 8,
            emergency_confidence_threshold: 0.75,
            review_confidence_threshold: 0.5,
        }
    }
}

/// Second-pass validation over a [`TriageJudgment`].
pub struct SafetyValidator {
    service: Option<Arc<dyn ValidationService>>,
    config: ValidatorConfig,
}

impl SafetyValidator {
    pub fn new(service: Option<Arc<dyn ValidationService>>, config: ValidatorConfig) -> Self {
        Self { service, config }
    }

    pub fn rule_based(config: ValidatorConfig) -> Self {
        Self::new(None, config)
    }

    /// Validate a judgment. Total: every path, including a failing backing
    /// service, produces an outcome.
    pub async fn validate(
        &self,
        judgment: &TriageJudgment,
        symptoms: &[String],
        context: &[ContextSnippet],
    ) -> ValidationOutcome {
        debug!(
            symptom_count = symptoms.len(),
            context_count = context.len(),
            score = judgment.score,
            "validating triage judgment"
        );

        let Some(service) = &self.service else {
            return self.rule_based_validation(judgment);
        };

        match service.validate(judgment, symptoms, context).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "validation service failed, returning conservative outcome");
                ValidationOutcome {
                    validated: false,
                    risk_flag: RiskFlag::ValidationError,
                    adjusted_score: judgment.score,
                    notes: format!("Validation error: {e}"),
                }
            }
        }
    }

    /// Rule-based validation, applied in a fixed order so the reported
    /// risk flag is deterministic when several rules fire together: the
    /// first failing rule owns the flag, every triggered rule appends its
    /// note, and any failure clears `validated`.
    fn rule_based_validation(&self, judgment: &TriageJudgment) -> ValidationOutcome {
        let mut validated = true;
        let mut risk_flag = RiskFlag::None;
        let mut notes: Vec<String> = Vec::new();
        let mut adjusted_score = judgment.score;

        let mut fail = |flag: RiskFlag,
                        note: String,
                        validated: &mut bool,
                        risk_flag: &mut RiskFlag,
                        notes: &mut Vec<String>| {
            if *validated {
                *risk_flag = flag;
            }
            *validated = false;
            notes.push(note);
        };

        // Rule 1: emergency flag must be backed by both thresholds.
        if judgment.is_emergency
            && (judgment.score < self.config.emergency_score_threshold
                || judgment.confidence < self.config.emergency_confidence_threshold)
        {
            fail(
                RiskFlag::ThresholdError,
                "Emergency flag does not meet threshold criteria".to_string(),
                &mut validated,
                &mut risk_flag,
                &mut notes,
            );
        }

        // Rule 2: required fields must be present.
        for (field, value) in [
            ("condition_detected", &judgment.condition),
            ("reasoning_summary", &judgment.rationale),
        ] {
            if value.trim().is_empty() {
                fail(
                    RiskFlag::IncompleteData,
                    format!("Missing required field: {field}"),
                    &mut validated,
                    &mut risk_flag,
                    &mut notes,
                );
            }
        }

        // Rule 3: score must be inside the valid range; clamp if not.
        if !judgment.score_in_range() {
            adjusted_score = judgment.score.clamp(SCORE_MIN, SCORE_MAX);
            fail(
                RiskFlag::ThresholdError,
                "Triage score out of valid range".to_string(),
                &mut validated,
                &mut risk_flag,
                &mut notes,
            );
        }

        // Rule 4: low confidence passes, with an advisory note.
        if judgment.confidence < self.config.review_confidence_threshold {
            notes.push("Low confidence score - recommend human review".to_string());
        }

        if !validated {
            warn!(?risk_flag, "triage judgment failed rule-based validation");
        }

        ValidationOutcome {
            validated,
            risk_flag,
            adjusted_score,
            notes: if notes.is_empty() {
                "Validation passed".to_string()
            } else {
                notes.join("; ")
            },
        }
    }
}
