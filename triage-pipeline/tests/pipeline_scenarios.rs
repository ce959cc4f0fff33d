//! End-to-end case processing scenarios
//!
//! These tests run the full pipeline against in-memory collaborators:
//! an unconfigured deployment (no judgment service, no guideline index)
//! falling back to rule-based triage, a configured judgment service, the
//! referral path including alert delivery, and the concurrent-referral
//! capacity race.

use async_trait::async_trait;
use resource_matcher::{HospitalDirectory, InMemoryHospitalDirectory, MatcherConfig, ResourceMatcher};
use std::sync::Arc;
use std::time::Duration;
use triage_pipeline::{
    InMemoryAlertSink, InMemoryAuditSink, PipelineConfig, TranscriptionError, TranscriptionService,
    TriagePipeline,
};
use triage_scorer::{
    JudgmentRequest, JudgmentService, ScorerConfig, ScorerError, ScorerResult, TriageScorer,
};
use triage_types::{
    CapacityStatus, CaseInput, Hospital, PatientSnapshot, PipelineStage, Transcription,
    TriageJudgment, TriageLevel,
};
use uuid::Uuid;

fn patient() -> PatientSnapshot {
    PatientSnapshot {
        patient_id: Uuid::new_v4(),
        age: "34".to_string(),
        gender: "female".to_string(),
        latitude: Some(0.3476),
        longitude: Some(32.5825),
    }
}

fn hospital(name: &str, active: u32, max: u32) -> Hospital {
    Hospital {
        id: Uuid::new_v4(),
        name: name.to_string(),
        latitude: 0.0512,
        longitude: 32.4637,
        phone_number: "+256700000001".to_string(),
        specialties: vec!["general".to_string(), "emergency".to_string()],
        capacity_status: CapacityStatus::Available,
        active_referrals: active,
        max_capacity: max,
        is_operational: true,
    }
}

fn matcher(directory: Arc<InMemoryHospitalDirectory>) -> ResourceMatcher {
    ResourceMatcher::new(directory, MatcherConfig::default())
}

struct TestHarness {
    pipeline: TriagePipeline,
    directory: Arc<InMemoryHospitalDirectory>,
    alerts: Arc<InMemoryAlertSink>,
    audit: Arc<InMemoryAuditSink>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Unconfigured deployment: rule-based scorer, no guideline index.
fn offline_harness(hospitals: Vec<Hospital>) -> TestHarness {
    init_tracing();
    let directory = Arc::new(InMemoryHospitalDirectory::new(hospitals));
    let alerts = Arc::new(InMemoryAlertSink::new());
    let audit = Arc::new(InMemoryAuditSink::new());
    let pipeline = TriagePipeline::builder(matcher(directory.clone()))
        .alert_sink(alerts.clone())
        .audit_sink(audit.clone())
        .build();
    TestHarness {
        pipeline,
        directory,
        alerts,
        audit,
    }
}

// ============================================================================
// Scenario A: critical symptom, fully unconfigured deployment
// ============================================================================

#[tokio::test]
async fn unconscious_patient_triggers_emergency_referral_without_any_service() {
    let h = offline_harness(vec![hospital("Entebbe General", 0, 50)]);
    let input = CaseInput::from_text("The patient is unconscious and very hot", patient());
    let case_id = input.case_id;

    let result = h.pipeline.process_case(input, "vht_0042").await;

    assert!(result.success, "error: {:?}", result.error);
    let judgment = result.judgment.as_ref().unwrap();
    assert_eq!(judgment.score, 9);
    assert_eq!(judgment.confidence, 0.75);
    assert!(result.validation.as_ref().unwrap().validated);
    assert!(result.emergency);
    assert_eq!(result.triage_level, Some(TriageLevel::Urgent));
    assert_eq!(result.stage, PipelineStage::Completed);

    // Referral assigned and slot claimed.
    let referral = result.referral.as_ref().unwrap();
    assert!(referral.success);
    let decision = referral.referral.as_ref().unwrap();
    assert_eq!(decision.hospital_name, "Entebbe General");
    assert!(decision.travel_time_minutes >= 15);
    assert_eq!(
        h.directory.get(decision.hospital_id).await.unwrap().active_referrals,
        1
    );

    // Alert went to the receiving facility.
    assert!(result.alert_sent);
    let sent = h.alerts.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("Severity: CRITICAL"));

    // Exactly one audit record for the case.
    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].case_id, case_id);
    assert_eq!(records[0].actor, "vht_0042");
}

// ============================================================================
// Scenario B: routine symptom, gate stays closed
// ============================================================================

#[tokio::test]
async fn headache_stays_routine_with_moderate_classification() {
    let h = offline_harness(vec![hospital("Entebbe General", 0, 50)]);
    let input = CaseInput::from_text("Complains of a headache since yesterday", patient());

    let result = h.pipeline.process_case(input, "vht_0042").await;

    assert!(result.success);
    assert_eq!(result.judgment.as_ref().unwrap().score, 6);
    assert!(!result.emergency);
    assert_eq!(result.triage_level, Some(TriageLevel::Moderate));
    assert!(result.referral.is_none());
    assert!(!result.alert_sent);
    assert!(h.alerts.sent().is_empty());
    // Audit still happens on routine cases.
    assert_eq!(h.audit.records().len(), 1);
}

// ============================================================================
// Scenario C: configured judgment service, confidence below the gate
// ============================================================================

struct FixedJudgment(TriageJudgment);

#[async_trait]
impl JudgmentService for FixedJudgment {
    async fn score(&self, _request: &JudgmentRequest) -> ScorerResult<TriageJudgment> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn high_score_low_confidence_does_not_open_the_gate() {
    let directory = Arc::new(InMemoryHospitalDirectory::new(vec![hospital(
        "Entebbe General",
        0,
        50,
    )]));
    let audit = Arc::new(InMemoryAuditSink::new());
    let service = FixedJudgment(TriageJudgment {
        score: 9,
        confidence: 0.6,
        condition: "Severe malaria".to_string(),
        is_emergency: false,
        specialty: "emergency".to_string(),
        first_aid: "Start ORS".to_string(),
        rationale: "high fever with convulsions".to_string(),
        citation: "p. 102".to_string(),
    });
    let pipeline = TriagePipeline::builder(matcher(directory.clone()))
        .scorer(TriageScorer::new(
            Some(Arc::new(service)),
            ScorerConfig::default(),
        ))
        .audit_sink(audit.clone())
        .build();

    let input = CaseInput::from_text("high fever and fits", patient());
    let result = pipeline.process_case(input, "vht_0042").await;

    assert!(result.success);
    assert!(result.validation.as_ref().unwrap().validated);
    // Score qualifies but confidence is below 0.75.
    assert!(!result.emergency);
    assert_eq!(result.triage_level, Some(TriageLevel::Urgent));
    assert!(result.referral.is_none());
    // No slot was claimed.
    let hospitals = directory.find_operational(None, false).await;
    assert_eq!(hospitals[0].active_referrals, 0);
}

// ============================================================================
// Input validation and transcription failure paths
// ============================================================================

#[tokio::test]
async fn case_without_transcript_or_audio_fails_structurally() {
    let h = offline_harness(vec![]);
    let input = CaseInput {
        case_id: Uuid::new_v4(),
        transcript: None,
        audio_ref: None,
        language_hint: "en".to_string(),
        patient: patient(),
    };

    let result = h.pipeline.process_case(input, "vht_0042").await;

    assert!(!result.success);
    assert_eq!(result.stage, PipelineStage::Failed);
    assert!(result.error.as_ref().unwrap().contains("Missing case input"));
    // Fatal before any stage ran: no judgment, no audit.
    assert!(result.judgment.is_none());
    assert!(h.audit.records().is_empty());
}

struct StubTranscriber {
    confidence: f32,
    fail: bool,
}

#[async_trait]
impl TranscriptionService for StubTranscriber {
    async fn transcribe(
        &self,
        _audio_ref: &str,
        language_hint: &str,
    ) -> Result<Transcription, TranscriptionError> {
        if self.fail {
            return Err(TranscriptionError::Service("decoder crashed".to_string()));
        }
        Ok(Transcription {
            text: "Patient reports high fever, severe headache, and body pain for 3 days"
                .to_string(),
            detected_language: language_hint.to_string(),
            confidence: self.confidence,
            duration_seconds: 15.3,
        })
    }
}

#[tokio::test]
async fn low_transcription_confidence_warns_but_continues() {
    let directory = Arc::new(InMemoryHospitalDirectory::new(vec![]));
    let pipeline = TriagePipeline::builder(matcher(directory))
        .transcription(Arc::new(StubTranscriber {
            confidence: 0.55,
            fail: false,
        }))
        .build();

    let input = CaseInput::from_audio("uploads/case_771.wav", "lg", patient());
    let result = pipeline.process_case(input, "vht_0042").await;

    assert!(result.success);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("Low translation confidence")));
    assert_eq!(result.transcription.as_ref().unwrap().confidence, 0.55);
    // Fever, headache and body pain were picked up from the transcript.
    assert!(!result.symptoms.is_empty());
}

#[tokio::test]
async fn transcription_error_fails_the_whole_case() {
    let directory = Arc::new(InMemoryHospitalDirectory::new(vec![]));
    let pipeline = TriagePipeline::builder(matcher(directory))
        .transcription(Arc::new(StubTranscriber {
            confidence: 0.9,
            fail: true,
        }))
        .build();

    let input = CaseInput::from_audio("uploads/case_772.wav", "en", patient());
    let result = pipeline.process_case(input, "vht_0042").await;

    assert!(!result.success);
    assert!(result
        .error
        .as_ref()
        .unwrap()
        .starts_with("Transcription failed"));
    assert_eq!(result.stage, PipelineStage::Failed);
}

// ============================================================================
// Case-level timeout
// ============================================================================

struct StalledJudgment;

#[async_trait]
impl JudgmentService for StalledJudgment {
    async fn score(&self, _request: &JudgmentRequest) -> ScorerResult<TriageJudgment> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(ScorerError::Service("never reached".to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn stalled_case_fails_with_a_timeout_reason() {
    let directory = Arc::new(InMemoryHospitalDirectory::new(vec![]));
    // Case budget far below the scorer's own service timeout, so the case
    // deadline fires first.
    let pipeline = TriagePipeline::builder(matcher(directory))
        .config(PipelineConfig {
            case_timeout_ms: 50,
            ..PipelineConfig::default()
        })
        .scorer(TriageScorer::new(
            Some(Arc::new(StalledJudgment)),
            ScorerConfig::default(),
        ))
        .build();

    let input = CaseInput::from_text("high fever", patient());
    let result = pipeline.process_case(input, "vht_0042").await;

    assert!(!result.success);
    assert_eq!(result.stage, PipelineStage::Failed);
    assert!(result.error.as_ref().unwrap().starts_with("Timeout"));
    assert!(result.judgment.is_none());
}

// ============================================================================
// Referral failure is not case failure
// ============================================================================

#[tokio::test]
async fn emergency_without_any_hospital_keeps_the_triage_result() {
    let h = offline_harness(vec![]);
    let input = CaseInput::from_text("not breathing after severe bleeding", patient());

    let result = h.pipeline.process_case(input, "vht_0042").await;

    // The triage decision stands even though no hospital was found.
    assert!(result.success);
    assert!(result.emergency);
    let referral = result.referral.as_ref().unwrap();
    assert!(!referral.success);
    assert!(referral.error.as_ref().unwrap().contains("No available hospitals"));
    assert!(!result.alert_sent);
    // Audit record is still emitted.
    assert_eq!(h.audit.records().len(), 1);
}

// ============================================================================
// Concurrent referrals cannot oversubscribe the last slot
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_concurrent_emergencies_cannot_both_claim_the_last_slot() {
    let target = hospital("Last Slot HC IV", 49, 50);
    let target_id = target.id;
    let directory = Arc::new(InMemoryHospitalDirectory::new(vec![target]));
    let pipeline = Arc::new(
        TriagePipeline::builder(matcher(directory.clone()))
            .audit_sink(Arc::new(InMemoryAuditSink::new()))
            .build(),
    );

    let mut cases = Vec::new();
    for _ in 0..2 {
        let pipeline = pipeline.clone();
        cases.push(tokio::spawn(async move {
            let input = CaseInput::from_text("patient unconscious", patient());
            pipeline.process_case(input, "vht_0042").await
        }));
    }

    let mut referral_successes = 0;
    for case in cases {
        let result = case.await.unwrap();
        assert!(result.success);
        assert!(result.emergency);
        if result.referral.as_ref().map(|r| r.success).unwrap_or(false) {
            referral_successes += 1;
        }
    }

    assert_eq!(referral_successes, 1);
    let after = directory.get(target_id).await.unwrap();
    assert_eq!(after.active_referrals, after.max_capacity);
}
