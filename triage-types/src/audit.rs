use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only snapshot of a pipeline decision. Never mutated after
/// creation; exactly one is emitted per case, referral or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub case_id: Uuid,
    /// Who the decision was made on behalf of, e.g. a VHT worker id.
    pub actor: String,
    pub action: String,
    pub description: String,
    /// Full serialized case result.
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        case_id: Uuid,
        actor: impl Into<String>,
        action: impl Into<String>,
        description: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            case_id,
            actor: actor.into(),
            action: action.into(),
            description: description.into(),
            payload,
            recorded_at: Utc::now(),
        }
    }
}
