use crate::{
    build_system_prompt, build_user_prompt, JudgmentRequest, JudgmentService, ScorerConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use triage_types::{ContextSnippet, TriageJudgment};

/// Produces one [`TriageJudgment`] per case.
///
/// Stateless between calls: a pure function of its configuration, the
/// injected service (if any) and the inputs. Never fails outright — every
/// degraded path still yields a judgment with a score inside [1, 10].
pub struct TriageScorer {
    service: Option<Arc<dyn JudgmentService>>,
    config: ScorerConfig,
}

impl TriageScorer {
    pub fn new(service: Option<Arc<dyn JudgmentService>>, config: ScorerConfig) -> Self {
        Self { service, config }
    }

    /// Scorer with no backing service; every case goes through the
    /// deterministic fallback.
    pub fn fallback_only(config: ScorerConfig) -> Self {
        Self::new(None, config)
    }

    /// Score a case from normalized symptoms, demographics and retrieved
    /// context (ordered most-relevant-first).
    pub async fn score(
        &self,
        symptoms: &[String],
        age: &str,
        gender: &str,
        context: &[ContextSnippet],
    ) -> TriageJudgment {
        let Some(service) = &self.service else {
            warn!("judgment service not configured, using rule-based fallback scorer");
            return self.fallback_judgment(symptoms, age, gender);
        };

        let request = self.build_request(symptoms, age, gender, context);
        let timeout = Duration::from_millis(self.config.service_timeout_ms);

        match tokio::time::timeout(timeout, service.score(&request)).await {
            Ok(Ok(judgment)) => {
                debug!(
                    score = judgment.score,
                    confidence = judgment.confidence,
                    "judgment service returned"
                );
                judgment
            }
            Ok(Err(e)) => {
                error!(error = %e, "triage analysis failed, degrading to error judgment");
                self.error_judgment(&e.to_string())
            }
            Err(_) => {
                error!(
                    timeout_ms = self.config.service_timeout_ms,
                    "judgment service timed out, degrading to error judgment"
                );
                self.error_judgment("judgment service timed out")
            }
        }
    }

    fn build_request(
        &self,
        symptoms: &[String],
        age: &str,
        gender: &str,
        context: &[ContextSnippet],
    ) -> JudgmentRequest {
        JudgmentRequest {
            symptoms: symptoms.to_vec(),
            age: age.to_string(),
            gender: gender.to_string(),
            context: context.to_vec(),
            system_prompt: build_system_prompt(
                self.config.emergency_score_threshold,
                self.config.emergency_confidence_threshold,
            ),
            user_prompt: build_user_prompt(symptoms, age, gender, context),
        }
    }

    /// Deterministic rule-based judgment used when no service is configured.
    fn fallback_judgment(&self, symptoms: &[String], age: &str, gender: &str) -> TriageJudgment {
        let critical = symptoms
            .iter()
            .any(|s| self.config.critical_symptoms.iter().any(|c| c == s));

        let score = if critical {
            self.config.fallback_emergency_score
        } else {
            self.config.fallback_moderate_score
        };
        let emergent = score >= self.config.emergency_score_threshold;

        TriageJudgment {
            score,
            confidence: self.config.fallback_confidence,
            condition: if score > 7 {
                "Suspected critical condition".to_string()
            } else {
                "General illness".to_string()
            },
            is_emergency: emergent,
            specialty: if emergent { "emergency" } else { "general" }.to_string(),
            first_aid: "Keep patient hydrated, monitor vital signs, prepare for transport"
                .to_string(),
            rationale: format!(
                "Patient {}, {} presenting with {}. Rule-based triage: no judgment service configured.",
                age,
                gender,
                symptoms.join(", ")
            ),
            citation: String::new(),
        }
    }

    /// Minimum-confidence, mid-score judgment carrying the failure reason.
    fn error_judgment(&self, reason: &str) -> TriageJudgment {
        TriageJudgment {
            score: 5,
            confidence: 0.0,
            condition: "Error in triage".to_string(),
            is_emergency: false,
            specialty: "general".to_string(),
            first_aid: String::new(),
            rationale: format!("Error: {reason}"),
            citation: String::new(),
        }
    }
}
