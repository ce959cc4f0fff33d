use crate::{AlertReceipt, AlertSink, AuditSink};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;
use triage_types::AuditRecord;
use uuid::Uuid;

/// Alert sink that logs the message instead of delivering it.
///
/// Used by offline pilots without an SMS provider and as the default sink;
/// it reports success so the rest of the pipeline behaves as in production.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send(&self, contact: &str, message: &str) -> AlertReceipt {
        info!(%contact, %message, "emergency alert (log-only delivery)");
        AlertReceipt {
            success: true,
            delivery_id: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// Audit sink that logs each record.
pub struct LogAuditSink;

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn record(&self, record: AuditRecord) {
        info!(
            case_id = %record.case_id,
            action = %record.action,
            description = %record.description,
            "audit record"
        );
    }
}

/// Alert sink that captures sent messages for inspection in tests.
#[derive(Default)]
pub struct InMemoryAlertSink {
    sent: Mutex<Vec<(String, String)>>,
}

impl InMemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl AlertSink for InMemoryAlertSink {
    async fn send(&self, contact: &str, message: &str) -> AlertReceipt {
        self.sent
            .lock()
            .push((contact.to_string(), message.to_string()));
        AlertReceipt {
            success: true,
            delivery_id: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// Audit sink that retains records in memory for inspection in tests.
#[derive(Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, record: AuditRecord) {
        self.records.lock().push(record);
    }
}
