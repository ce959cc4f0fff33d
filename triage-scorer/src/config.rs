use serde::{Deserialize, Serialize};

/// Triage scorer configuration.
///
/// `fallback_confidence` directly controls whether the emergency gate is
/// reachable without a configured judgment service: the gate requires
/// confidence >= 0.75, and the default of 0.75 deliberately sits exactly at
/// that threshold so a critical-symptom case can still trigger an automatic
/// referral in an offline deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Score assigned by the fallback when a critical symptom is present.
    pub fallback_emergency_score: i32,
    /// Score assigned by the fallback otherwise.
    pub fallback_moderate_score: i32,
    /// Fixed confidence reported by the fallback scorer.
    pub fallback_confidence: f32,
    /// Canonical tags the fallback treats as potentially emergent.
    pub critical_symptoms: Vec<String>,
    /// Upper bound on a single judgment service call.
    pub service_timeout_ms: u64,
    /// Emergency score threshold rendered into the system prompt and used
    /// for the fallback's advisory emergency flag.
    pub emergency_score_threshold: i32,
    /// Emergency confidence threshold rendered into the system prompt.
    pub emergency_confidence_threshold: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            fallback_emergency_score: 9,
            fallback_moderate_score: 6,
            fallback_confidence: 0.75,
            critical_symptoms: [
                "seizure",
                "loss_of_consciousness",
                "respiratory_failure",
                "hemorrhage",
                "unconscious",
                "not_breathing",
                "severe_bleeding",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            service_timeout_ms: 30_000,
            emergency_score_threshold: 8,
            emergency_confidence_threshold: 0.75,
        }
    }
}

impl ScorerConfig {
    /// Load configuration from environment variables, keeping defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fallback_confidence: std::env::var("SCORER_FALLBACK_CONFIDENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.fallback_confidence),
            service_timeout_ms: std::env::var("SCORER_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.service_timeout_ms),
            ..defaults
        }
    }
}
