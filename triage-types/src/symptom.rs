use serde::{Deserialize, Serialize};

/// One normalized symptom, produced by the normalizer and consumed
/// read-only by every downstream stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomRecord {
    /// The phrase as the worker reported it.
    pub raw: String,
    /// Canonical vocabulary tag the phrase mapped to.
    pub standardized: String,
    /// True when the raw or canonical form matches the emergency keyword set.
    pub is_emergency_keyword: bool,
    /// 1.0 for a vocabulary hit, lower for a transliterated unknown.
    pub confidence: f32,
}

/// Body-system buckets used when categorizing canonical tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomCategory {
    Respiratory,
    Gastrointestinal,
    Neurological,
    Cardiovascular,
    General,
}
