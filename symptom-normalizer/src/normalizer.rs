use crate::SymptomVocabulary;
use std::collections::BTreeMap;
use tracing::debug;
use triage_types::{SymptomCategory, SymptomRecord};

/// Confidence assigned to a phrase the vocabulary recognized.
const TABLE_HIT_CONFIDENCE: f32 = 1.0;
/// Confidence assigned to an unmatched phrase carried through verbatim.
const FALLBACK_CONFIDENCE: f32 = 0.7;

/// Normalizes raw symptom descriptions to standardized medical terminology.
///
/// Stateless apart from its immutable vocabulary; safe to share across
/// concurrently processed cases.
#[derive(Debug, Clone, Default)]
pub struct SymptomNormalizer {
    vocabulary: SymptomVocabulary,
}

impl SymptomNormalizer {
    pub fn new(vocabulary: SymptomVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Normalize raw symptom phrases into [`SymptomRecord`]s.
    ///
    /// Vocabulary hits get the canonical tag at full confidence; unmatched
    /// input is transliterated (whitespace to underscores) and marked lower
    /// confidence so downstream consumers can weigh it accordingly.
    pub fn normalize(&self, raw_symptoms: &[String]) -> Vec<SymptomRecord> {
        let records: Vec<SymptomRecord> = raw_symptoms
            .iter()
            .map(|raw| self.normalize_one(raw))
            .collect();
        debug!(count = records.len(), "normalized symptoms");
        records
    }

    fn normalize_one(&self, raw: &str) -> SymptomRecord {
        let lowered = raw.to_lowercase();
        let lowered = lowered.trim();

        let (standardized, confidence) = match self.vocabulary.lookup(lowered) {
            Some(tag) => (tag.to_string(), TABLE_HIT_CONFIDENCE),
            None => (lowered.replace(' ', "_"), FALLBACK_CONFIDENCE),
        };

        let is_emergency_keyword = self.vocabulary.is_emergency(lowered, &standardized);

        SymptomRecord {
            raw: raw.to_string(),
            standardized,
            is_emergency_keyword,
            confidence,
        }
    }

    /// Extract symptom mentions from free-form report text.
    ///
    /// Returns the matched vocabulary fragments in match-priority order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.vocabulary
            .keys()
            .filter(|key| lowered.contains(key))
            .map(str::to_string)
            .collect()
    }

    /// Bucket canonical tags into body-system categories.
    ///
    /// Every record lands in exactly one bucket; tags the vocabulary does
    /// not place fall into [`SymptomCategory::General`].
    pub fn categorize(
        &self,
        records: &[SymptomRecord],
    ) -> BTreeMap<SymptomCategory, Vec<String>> {
        let mut categories = BTreeMap::new();
        for record in records {
            categories
                .entry(self.vocabulary.category_of(&record.standardized))
                .or_insert_with(Vec::new)
                .push(record.standardized.clone());
        }
        categories
    }
}
