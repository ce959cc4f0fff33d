use serde::{Deserialize, Serialize};

/// Risk classification attached to a validation outcome.
///
/// Exactly one flag is reported even when several rules fire; precedence is
/// fixed by rule order in the validator so the outcome is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    None,
    Hallucination,
    ThresholdError,
    CitationError,
    IncompleteData,
    ValidationError,
}

/// Result of the safety validation pass over a triage judgment.
///
/// Derived data: it references the judgment it was computed from and does
/// not persist independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub validated: bool,
    pub risk_flag: RiskFlag,
    /// Score the orchestrator should use. Equal to the original score
    /// unless the range rule clamped it.
    pub adjusted_score: i32,
    /// Semicolon-joined notes from every triggered rule.
    pub notes: String,
}
