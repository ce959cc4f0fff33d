use crate::{
    build_alert_message, AlertSink, AuditSink, LogAlertSink, LogAuditSink, PipelineConfig,
    PipelineError, PipelineResult, TranscriptionService,
};
use guideline_retrieval::GuidelineRetriever;
use resource_matcher::ResourceMatcher;
use safety_validator::{SafetyValidator, ValidatorConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use symptom_normalizer::SymptomNormalizer;
use tracing::{error, info, warn};
use triage_scorer::{ScorerConfig, TriageScorer};
use triage_types::{
    AlertSeverity, AuditRecord, CaseInput, CaseResult, PipelineStage, ReferralDecision,
    ReferralOutcome, Transcription, TriageJudgment, TriageLevel,
};
use uuid::Uuid;

/// The case processing orchestrator.
///
/// Holds every collaborator as injected state; construction wires the
/// pipeline once and `process_case` runs any number of independent cases
/// concurrently. The one piece of shared mutable state, hospital load
/// counters, lives behind the matcher's directory.
pub struct TriagePipeline {
    config: PipelineConfig,
    transcription: Option<Arc<dyn TranscriptionService>>,
    normalizer: SymptomNormalizer,
    retriever: GuidelineRetriever,
    scorer: TriageScorer,
    validator: SafetyValidator,
    matcher: ResourceMatcher,
    alerts: Arc<dyn AlertSink>,
    audit: Arc<dyn AuditSink>,
}

/// Builder over the pipeline's injectable collaborators.
///
/// Only the resource matcher is mandatory (there is no sensible default
/// hospital registry); everything else defaults to its offline fallback:
/// no transcription service, uninitialized retrieval, rule-based scorer and
/// validator, log-only alert and audit sinks.
pub struct TriagePipelineBuilder {
    config: PipelineConfig,
    transcription: Option<Arc<dyn TranscriptionService>>,
    normalizer: SymptomNormalizer,
    retriever: Option<GuidelineRetriever>,
    scorer: Option<TriageScorer>,
    validator: Option<SafetyValidator>,
    matcher: ResourceMatcher,
    alerts: Option<Arc<dyn AlertSink>>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl TriagePipeline {
    pub fn builder(matcher: ResourceMatcher) -> TriagePipelineBuilder {
        TriagePipelineBuilder {
            config: PipelineConfig::default(),
            transcription: None,
            normalizer: SymptomNormalizer::default(),
            retriever: None,
            scorer: None,
            validator: None,
            matcher,
            alerts: None,
            audit: None,
        }
    }

    /// Process one case end to end.
    ///
    /// Never returns an error: fatal conditions (missing input, failed
    /// transcription, case timeout) come back as a structured result with
    /// `success = false` and the first error message encountered.
    pub async fn process_case(&self, input: CaseInput, actor: &str) -> CaseResult {
        let start = Instant::now();
        let mut result = CaseResult::received(input.case_id);
        info!(case_id = %input.case_id, "starting case processing");

        let budget = Duration::from_millis(self.config.case_timeout_ms);
        let staged = tokio::time::timeout(budget, self.run_stages(&mut result, &input, actor))
            .await
            .unwrap_or(Err(PipelineError::Timeout(self.config.case_timeout_ms)));

        if let Err(e) = staged {
            error!(case_id = %input.case_id, error = %e, "case processing failed");
            result.fail(e.to_string());
        }

        result.elapsed_seconds = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;
        info!(
            case_id = %input.case_id,
            success = result.success,
            emergency = result.emergency,
            elapsed_seconds = result.elapsed_seconds,
            "case processing finished"
        );
        result
    }

    async fn run_stages(
        &self,
        result: &mut CaseResult,
        input: &CaseInput,
        actor: &str,
    ) -> PipelineResult<()> {
        // Stage 1: obtain report text, transcribing when audio was supplied.
        let text = self.obtain_text(result, input).await?;
        result.stage = PipelineStage::Transcribed;

        // Stage 2: extract, normalize and categorize symptoms.
        let raw_symptoms = self.normalizer.extract(&text);
        let records = self.normalizer.normalize(&raw_symptoms);
        let canonical: Vec<String> = records.iter().map(|r| r.standardized.clone()).collect();
        result.symptom_categories = self.normalizer.categorize(&records);
        result.symptoms_raw = raw_symptoms;
        result.symptoms = records;
        result.stage = PipelineStage::Normalized;

        // Stage 3: guideline context, empty on any retrieval degradation.
        let context = self
            .retriever
            .retrieve_context(&canonical, &input.patient.age, &input.patient.gender)
            .await;
        result.stage = PipelineStage::ContextRetrieved;

        // Stage 4: triage judgment.
        let mut judgment = self
            .scorer
            .score(&canonical, &input.patient.age, &input.patient.gender, &context)
            .await;
        result.stage = PipelineStage::Scored;

        // Stage 5: safety validation; a failed validation overrides the
        // working score but keeps the judgment's other fields.
        let validation = self.validator.validate(&judgment, &canonical, &context).await;
        if !validation.validated {
            warn!(
                case_id = %input.case_id,
                risk_flag = ?validation.risk_flag,
                "validation failed, overriding working score"
            );
            judgment.score = validation.adjusted_score;
            result.warn(format!("Validation override: {}", validation.notes));
        }
        result.stage = PipelineStage::Validated;

        // Stage 6: the emergency gate, recomputed from the working values.
        // The scorer's own is_emergency flag is advisory and ignored here.
        let emergency = self.config.emergency_gate(
            judgment.score,
            judgment.confidence,
            validation.validated,
        );
        result.emergency = emergency;
        result.stage = PipelineStage::Gated;

        // Stage 7: triage classification, applied on every case regardless
        // of the gate.
        result.triage_level = Some(TriageLevel::from_score(judgment.score));

        // Stage 8: referral and alert, only when the gate fired. A failed
        // referral never fails the case.
        if emergency {
            let summary = canonical.join(", ");
            let (referral, alert_sent) = self.refer_and_alert(input, &judgment, &summary).await;
            result.alert_sent = alert_sent;
            result.referral = Some(referral);
            result.stage = PipelineStage::Referred;
        }

        result.judgment = Some(judgment);
        result.validation = Some(validation);
        result.success = true;

        // Stage 9: one audit record per case, referral or not.
        result.stage = PipelineStage::Audited;
        self.record_audit(result, input, actor).await;
        result.stage = PipelineStage::Completed;

        Ok(())
    }

    async fn obtain_text(
        &self,
        result: &mut CaseResult,
        input: &CaseInput,
    ) -> PipelineResult<String> {
        if let Some(audio_ref) = &input.audio_ref {
            let Some(service) = &self.transcription else {
                return Err(PipelineError::TranscriptionFailed(
                    "transcription service not configured".to_string(),
                ));
            };

            let budget = Duration::from_millis(self.config.transcription_timeout_ms);
            let transcription =
                match tokio::time::timeout(budget, service.transcribe(audio_ref, &input.language_hint))
                    .await
                {
                    Ok(Ok(t)) => t,
                    Ok(Err(e)) => return Err(PipelineError::TranscriptionFailed(e.to_string())),
                    Err(_) => {
                        return Err(PipelineError::TranscriptionFailed(
                            "transcription timed out".to_string(),
                        ))
                    }
                };

            if transcription.confidence < self.config.transcription_warn_confidence {
                result.warn("Low translation confidence - may need clarification");
            }
            let text = transcription.text.clone();
            result.transcription = Some(transcription);
            return Ok(text);
        }

        match &input.transcript {
            Some(transcript) if !transcript.trim().is_empty() => {
                result.transcription = Some(Transcription {
                    text: transcript.clone(),
                    detected_language: input.language_hint.clone(),
                    confidence: 1.0,
                    duration_seconds: 0.0,
                });
                Ok(transcript.clone())
            }
            _ => Err(PipelineError::MissingInput(
                "no transcript or audio reference".to_string(),
            )),
        }
    }

    async fn refer_and_alert(
        &self,
        input: &CaseInput,
        judgment: &TriageJudgment,
        symptoms_summary: &str,
    ) -> (ReferralOutcome, bool) {
        let location = input.patient.location();
        let Some(hospital) = self
            .matcher
            .assign_hospital(location, &judgment.specialty, TriageLevel::Urgent)
            .await
        else {
            warn!(case_id = %input.case_id, "referral failed: no available hospitals");
            return (ReferralOutcome::failed("No available hospitals found"), false);
        };

        let travel_time = self
            .matcher
            .estimate_travel_time(location, hospital.location());

        let referral = ReferralDecision {
            referral_id: Uuid::new_v4(),
            hospital_id: hospital.id,
            hospital_name: hospital.name.clone(),
            hospital_contact: hospital.phone_number.clone(),
            urgency: TriageLevel::Urgent,
            travel_time_minutes: travel_time,
            capacity_status: hospital.capacity_status,
        };

        let severity = AlertSeverity::from_score(judgment.score);
        let message = build_alert_message(
            input.patient.patient_id,
            &referral,
            severity,
            symptoms_summary,
        );
        let receipt = self.alerts.send(&hospital.phone_number, &message).await;
        if !receipt.success {
            warn!(referral_id = %referral.referral_id, "emergency alert delivery failed");
        }
        info!(
            referral_id = %referral.referral_id,
            hospital = %hospital.name,
            travel_time_minutes = travel_time,
            "emergency referral created"
        );

        (ReferralOutcome::assigned(referral), receipt.success)
    }

    async fn record_audit(&self, result: &CaseResult, input: &CaseInput, actor: &str) {
        let condition = result
            .judgment
            .as_ref()
            .map(|j| j.condition.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let payload = serde_json::to_value(result).unwrap_or(serde_json::Value::Null);
        let record = AuditRecord::new(
            input.case_id,
            actor,
            "AI_DECISION",
            format!("AI Triage - {condition}"),
            payload,
        );
        self.audit.record(record).await;
    }
}

impl TriagePipelineBuilder {
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transcription(mut self, service: Arc<dyn TranscriptionService>) -> Self {
        self.transcription = Some(service);
        self
    }

    pub fn normalizer(mut self, normalizer: SymptomNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn retriever(mut self, retriever: GuidelineRetriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn scorer(mut self, scorer: TriageScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn validator(mut self, validator: SafetyValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(sink);
        self
    }

    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn build(self) -> TriagePipeline {
        TriagePipeline {
            config: self.config,
            transcription: self.transcription,
            normalizer: self.normalizer,
            retriever: self
                .retriever
                .unwrap_or_else(GuidelineRetriever::uninitialized),
            scorer: self
                .scorer
                .unwrap_or_else(|| TriageScorer::fallback_only(ScorerConfig::default())),
            validator: self
                .validator
                .unwrap_or_else(|| SafetyValidator::rule_based(ValidatorConfig::default())),
            matcher: self.matcher,
            alerts: self.alerts.unwrap_or_else(|| Arc::new(LogAlertSink)),
            audit: self.audit.unwrap_or_else(|| Arc::new(LogAuditSink)),
        }
    }
}
