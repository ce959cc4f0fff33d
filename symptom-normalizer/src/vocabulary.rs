use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use triage_types::SymptomCategory;

/// Immutable symptom vocabulary: phrase fragments to canonical tags,
/// emergency keywords, and category memberships.
///
/// Injected into the normalizer as configuration data so a deployment can
/// carry locale-specific phrase tables without code changes. Entries are
/// held longest-key-first so the most specific fragment always wins when
/// several keys are substrings of the same input ("passing stool with
/// blood" maps to dysentery before "passing stool" can claim diarrhea).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawVocabulary")]
pub struct SymptomVocabulary {
    entries: Vec<(String, String)>,
    emergency_keywords: Vec<String>,
    categories: Vec<(SymptomCategory, Vec<String>)>,
    #[serde(skip)]
    canonical: BTreeSet<String>,
}

/// Vocabulary data as it sits in a locale file, before key ordering and the
/// canonical set are established. Deserialization goes through this shape so
/// a loaded table gets the same normalization as one built in code.
#[derive(Deserialize)]
struct RawVocabulary {
    entries: Vec<(String, String)>,
    emergency_keywords: Vec<String>,
    categories: Vec<(SymptomCategory, Vec<String>)>,
}

impl From<RawVocabulary> for SymptomVocabulary {
    fn from(raw: RawVocabulary) -> Self {
        Self::new(raw.entries, raw.emergency_keywords, raw.categories)
    }
}

impl SymptomVocabulary {
    /// Build a vocabulary from raw parts, normalizing key order.
    pub fn new(
        entries: Vec<(String, String)>,
        emergency_keywords: Vec<String>,
        categories: Vec<(SymptomCategory, Vec<String>)>,
    ) -> Self {
        let mut entries = entries;
        // Longest key first, then lexicographic, so matching is deterministic.
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let canonical = entries.iter().map(|(_, tag)| tag.clone()).collect();
        Self {
            entries,
            emergency_keywords,
            categories,
            canonical,
        }
    }

    /// First matching canonical tag for a lowercased phrase, if any.
    ///
    /// A phrase that already is a canonical tag maps to itself, which makes
    /// normalization idempotent.
    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        for (key, tag) in &self.entries {
            if phrase.contains(key.as_str()) {
                return Some(tag);
            }
        }
        self.canonical.get(phrase).map(String::as_str)
    }

    /// Whether a raw phrase or its canonical form hits the emergency set.
    pub fn is_emergency(&self, raw: &str, standardized: &str) -> bool {
        self.emergency_keywords
            .iter()
            .any(|kw| raw.contains(kw.as_str()) || standardized == kw)
    }

    /// Category bucket for a canonical tag; unmatched tags are general.
    ///
    /// Buckets are checked in declaration order, so a tag listed under two
    /// systems (chest_pain is both respiratory and cardiovascular) lands
    /// deterministically in the first.
    pub fn category_of(&self, standardized: &str) -> SymptomCategory {
        for (category, tags) in &self.categories {
            if tags.iter().any(|t| t == standardized) {
                return *category;
            }
        }
        SymptomCategory::General
    }

    /// All phrase fragments, in match-priority order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl Default for SymptomVocabulary {
    /// The stock English + Luganda table used by Ugandan VHT deployments.
    fn default() -> Self {
        let entries = [
            // Fever
            ("hot body", "fever"),
            ("high temperature", "fever"),
            ("omusujja", "fever"),
            ("very hot", "fever"),
            ("burning", "fever"),
            // Seizure
            ("fits", "seizure"),
            ("convulsions", "seizure"),
            ("shaking", "seizure"),
            ("ensimbu", "seizure"),
            // Diarrhea
            ("passing stool with blood", "dysentery"),
            ("bloody stool", "dysentery"),
            ("passing stool", "diarrhea"),
            ("loose stool", "diarrhea"),
            ("running stomach", "diarrhea"),
            ("eddagala", "diarrhea"),
            // Respiratory
            ("cough", "cough"),
            ("okukohola", "cough"),
            ("difficulty breathing", "respiratory_distress"),
            ("short of breath", "respiratory_distress"),
            ("chest tightness", "chest_pain"),
            ("chest pain", "chest_pain"),
            ("wheezing", "wheezing"),
            // Pain
            ("headache", "headache"),
            ("head pain", "headache"),
            ("omutwe guguma", "headache"),
            ("stomach pain", "abdominal_pain"),
            ("belly pain", "abdominal_pain"),
            ("body pain", "body_ache"),
            ("joint pain", "arthralgia"),
            // Malaria-related
            ("shivering", "chills"),
            ("cold", "chills"),
            ("okukankana", "chills"),
            ("vomiting", "vomiting"),
            ("okusesema", "vomiting"),
            ("nausea", "nausea"),
            // Critical symptoms
            ("unconscious", "loss_of_consciousness"),
            ("not breathing", "respiratory_failure"),
            ("severe bleeding", "hemorrhage"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let emergency_keywords = [
            "unconscious",
            "not breathing",
            "severe bleeding",
            "seizure",
            "convulsions",
            "respiratory_distress",
            "respiratory_failure",
            "loss_of_consciousness",
            "chest_pain",
            "hemorrhage",
            "ensimbu",
            "okukankana",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let categories = vec![
            (
                SymptomCategory::Respiratory,
                to_tags(&["cough", "respiratory_distress", "wheezing", "chest_pain"]),
            ),
            (
                SymptomCategory::Gastrointestinal,
                to_tags(&["diarrhea", "dysentery", "vomiting", "nausea", "abdominal_pain"]),
            ),
            (
                SymptomCategory::Neurological,
                to_tags(&["seizure", "headache", "loss_of_consciousness"]),
            ),
            (
                SymptomCategory::Cardiovascular,
                to_tags(&["chest_pain", "palpitations"]),
            ),
        ];

        Self::new(entries, emergency_keywords, categories)
    }
}

fn to_tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}
