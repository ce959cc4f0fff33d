use serde::{Deserialize, Serialize};

/// Orchestrator configuration.
///
/// The emergency gate thresholds here are authoritative: the orchestrator
/// recomputes the gate from the working score and confidence and never
/// trusts the emergency flag a judgment service returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum post-validation score for the emergency gate.
    pub emergency_score_threshold: i32,
    /// Minimum confidence for the emergency gate.
    pub emergency_confidence_threshold: f32,
    /// Below this transcription confidence a non-fatal warning is attached.
    pub transcription_warn_confidence: f32,
    /// Upper bound on a single transcription call.
    pub transcription_timeout_ms: u64,
    /// Upper bound on the whole case; exceeding it fails the case with a
    /// timeout reason instead of hanging the worker.
    pub case_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            emergency_score_threshold: 8,
            emergency_confidence_threshold: 0.75,
            transcription_warn_confidence: 0.7,
            transcription_timeout_ms: 60_000,
            case_timeout_ms: 120_000,
        }
    }
}

impl PipelineConfig {
    /// The emergency gate: true iff the working score and confidence both
    /// clear their thresholds and validation passed.
    pub fn emergency_gate(&self, score: i32, confidence: f32, validated: bool) -> bool {
        score >= self.emergency_score_threshold
            && confidence >= self.emergency_confidence_threshold
            && validated
    }

    /// Load configuration from environment variables, keeping defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            emergency_score_threshold: std::env::var("PIPELINE_EMERGENCY_SCORE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.emergency_score_threshold),
            emergency_confidence_threshold: std::env::var("PIPELINE_EMERGENCY_CONFIDENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.emergency_confidence_threshold),
            transcription_warn_confidence: std::env::var("PIPELINE_TRANSCRIPTION_WARN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.transcription_warn_confidence),
            transcription_timeout_ms: std::env::var("PIPELINE_TRANSCRIPTION_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.transcription_timeout_ms),
            case_timeout_ms: std::env::var("PIPELINE_CASE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.case_timeout_ms),
        }
    }
}
