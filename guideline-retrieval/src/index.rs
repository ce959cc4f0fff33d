use async_trait::async_trait;
use triage_types::ContextSnippet;

/// Capability interface over the backing guideline index.
///
/// Implementations rank snippets most-relevant-first and must not surface
/// internal faults to the caller: a broken index returns an empty list.
/// The real implementation wraps a vector store over the ingested Uganda
/// MoH Clinical Guidelines; tests inject fixed-snippet stand-ins.
#[async_trait]
pub trait RetrievalIndex: Send + Sync {
    /// Query the index. Never errors; faults become empty results.
    async fn query(&self, text: &str) -> Vec<ContextSnippet>;
}

/// Fixed-snippet index used by tests and offline demos.
pub struct StaticIndex {
    snippets: Vec<ContextSnippet>,
}

impl StaticIndex {
    pub fn new(snippets: Vec<ContextSnippet>) -> Self {
        Self { snippets }
    }
}

#[async_trait]
impl RetrievalIndex for StaticIndex {
    async fn query(&self, _text: &str) -> Vec<ContextSnippet> {
        self.snippets.clone()
    }
}
