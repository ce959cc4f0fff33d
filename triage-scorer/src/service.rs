use crate::ScorerResult;
use async_trait::async_trait;
use triage_types::{ContextSnippet, TriageJudgment};

/// One fully assembled scoring request.
///
/// Carries both the structured inputs and the rendered prompts so a real
/// service implementation can submit the prompts directly while test
/// doubles inspect the structured fields.
#[derive(Debug, Clone)]
pub struct JudgmentRequest {
    pub symptoms: Vec<String>,
    pub age: String,
    pub gender: String,
    pub context: Vec<ContextSnippet>,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Capability interface over the backing judgment service (an LLM in
/// deterministic mode in production).
///
/// Absence of a configured implementation is a valid state, not an error:
/// the scorer then uses its rule-based fallback.
#[async_trait]
pub trait JudgmentService: Send + Sync {
    async fn score(&self, request: &JudgmentRequest) -> ScorerResult<TriageJudgment>;
}
