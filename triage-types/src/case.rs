use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single case report as received from a VHT worker.
///
/// Immutable once constructed; the pipeline takes it by value and never
/// writes back into it. At least one of `transcript` or `audio_ref` must be
/// present or the orchestrator fails the case before any stage runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseInput {
    pub case_id: Uuid,
    /// Pre-transcribed report text, if the worker typed instead of speaking.
    pub transcript: Option<String>,
    /// Opaque reference to an uploaded audio recording (path, object key).
    pub audio_ref: Option<String>,
    /// Language hint for transcription: "en", "lg", "sw".
    pub language_hint: String,
    pub patient: PatientSnapshot,
}

impl CaseInput {
    pub fn from_text(transcript: impl Into<String>, patient: PatientSnapshot) -> Self {
        Self {
            case_id: Uuid::new_v4(),
            transcript: Some(transcript.into()),
            audio_ref: None,
            language_hint: "en".to_string(),
            patient,
        }
    }

    pub fn from_audio(
        audio_ref: impl Into<String>,
        language_hint: impl Into<String>,
        patient: PatientSnapshot,
    ) -> Self {
        Self {
            case_id: Uuid::new_v4(),
            transcript: None,
            audio_ref: Some(audio_ref.into()),
            language_hint: language_hint.into(),
            patient,
        }
    }
}

/// Demographic snapshot of the patient at report time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub patient_id: Uuid,
    pub age: String,
    pub gender: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PatientSnapshot {
    /// Coordinates as a pair, present only when both axes are known.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Fixed triage classification bands, assigned from the post-validation
/// score on every case regardless of the emergency gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageLevel {
    Stable,
    Moderate,
    HighRisk,
    Urgent,
}

impl TriageLevel {
    /// Score banding: >=9 Urgent, >=7 HighRisk, >=4 Moderate, else Stable.
    pub fn from_score(score: i32) -> Self {
        if score >= 9 {
            Self::Urgent
        } else if score >= 7 {
            Self::HighRisk
        } else if score >= 4 {
            Self::Moderate
        } else {
            Self::Stable
        }
    }
}
