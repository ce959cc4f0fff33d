use serde::{Deserialize, Serialize};

/// Valid triage score range, inclusive.
pub const SCORE_MIN: i32 = 1;
pub const SCORE_MAX: i32 = 10;

/// The scored clinical assessment produced once per case.
///
/// A judgment is created by the scorer and mutated at most once afterwards:
/// the orchestrator applies the validator's adjusted score when validation
/// fails. No other component writes into it.
///
/// Scoring bands: 1-3 stable, 4-6 moderate, 7-8 high risk, 9-10 emergency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageJudgment {
    /// Triage severity score. Always within [`SCORE_MIN`]..=[`SCORE_MAX`]
    /// after validation; a raw service response may violate the range and
    /// is clamped, never propagated.
    pub score: i32,
    /// Model confidence in the judgment, 0.0..=1.0.
    pub confidence: f32,
    /// Condition label, e.g. "Suspected malaria with complications".
    pub condition: String,
    /// Emergency flag as claimed by the scorer. Advisory only: the
    /// orchestrator recomputes the gate and never trusts this directly.
    pub is_emergency: bool,
    /// Recommended receiving specialty, e.g. "emergency", "general".
    pub specialty: String,
    /// First-aid instructions to relay to the worker.
    pub first_aid: String,
    /// Reasoning summary behind the score.
    pub rationale: String,
    /// Guideline citation (page reference) when context was used.
    pub citation: String,
}

impl TriageJudgment {
    /// Whether the score sits inside the valid range.
    pub fn score_in_range(&self) -> bool {
        (SCORE_MIN..=SCORE_MAX).contains(&self.score)
    }
}
