use crate::RetrievalIndex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use triage_types::ContextSnippet;

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of top-ranked snippets to keep.
    pub top_k: usize,
    /// Upper bound on a single index query.
    pub query_timeout_ms: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            query_timeout_ms: 5_000,
        }
    }
}

impl RetrievalConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            top_k: std::env::var("RETRIEVAL_TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.top_k),
            query_timeout_ms: std::env::var("RETRIEVAL_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.query_timeout_ms),
        }
    }
}

/// Retrieves ranked guideline context for a case.
///
/// Holds an optional backing index; absence is a valid configured state
/// (guidelines not yet ingested) and yields empty context rather than an
/// error.
pub struct GuidelineRetriever {
    index: Option<Arc<dyn RetrievalIndex>>,
    config: RetrievalConfig,
}

impl GuidelineRetriever {
    pub fn new(index: Option<Arc<dyn RetrievalIndex>>, config: RetrievalConfig) -> Self {
        Self { index, config }
    }

    /// Retriever with no backing index; every query yields empty context.
    pub fn uninitialized() -> Self {
        Self::new(None, RetrievalConfig::default())
    }

    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    /// Retrieve the top-K guideline snippets for the given symptoms and
    /// demographics. Never fails; degraded paths return an empty list.
    pub async fn retrieve_context(
        &self,
        symptoms: &[String],
        age: &str,
        gender: &str,
    ) -> Vec<ContextSnippet> {
        let Some(index) = &self.index else {
            warn!("retrieval index not initialized, returning empty context");
            return Vec::new();
        };

        let query = build_query(symptoms, age, gender);
        debug!(%query, "querying guideline index");

        let timeout = Duration::from_millis(self.config.query_timeout_ms);
        match tokio::time::timeout(timeout, index.query(&query)).await {
            Ok(mut snippets) => {
                snippets.truncate(self.config.top_k);
                debug!(count = snippets.len(), "retrieved guideline context");
                snippets
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.query_timeout_ms,
                    "guideline index query timed out, returning empty context"
                );
                Vec::new()
            }
        }
    }
}

fn build_query(symptoms: &[String], age: &str, gender: &str) -> String {
    format!(
        "Patient: {} years, {}. Symptoms: {}",
        age,
        gender,
        symptoms.join(", ")
    )
}
