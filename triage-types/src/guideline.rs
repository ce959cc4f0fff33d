use serde::{Deserialize, Serialize};

/// A retrieved clinical guideline fragment.
///
/// Returned by the retrieval index most-relevant-first; that ordering is
/// preserved all the way into the scorer's prompt construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub content: String,
    /// Page reference within the source document, for citation.
    pub page_ref: String,
    /// Condition the fragment discusses, when the index knows it.
    pub condition: String,
    /// Source document identifier, e.g. "Uganda_MoH_Guidelines".
    pub source: String,
}
