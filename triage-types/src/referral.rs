use crate::{CapacityStatus, TriageLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An automated hospital referral, created at most once per case and only
/// after the emergency gate fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralDecision {
    pub referral_id: Uuid,
    pub hospital_id: Uuid,
    pub hospital_name: String,
    pub hospital_contact: String,
    pub urgency: TriageLevel,
    pub travel_time_minutes: u32,
    /// Capacity status of the receiving facility at assignment time.
    pub capacity_status: CapacityStatus,
}

/// Alert severity banding for emergency notifications:
/// score >=9 critical, >=7 high, else moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Critical,
    High,
    Moderate,
}

impl AlertSeverity {
    pub fn from_score(score: i32) -> Self {
        if score >= 9 {
            Self::Critical
        } else if score >= 7 {
            Self::High
        } else {
            Self::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
        }
    }
}

/// Outcome of the referral sub-step. A failed referral never fails the
/// case; the triage result stands regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralOutcome {
    pub success: bool,
    pub referral: Option<ReferralDecision>,
    pub error: Option<String>,
}

impl ReferralOutcome {
    pub fn assigned(referral: ReferralDecision) -> Self {
        Self {
            success: true,
            referral: Some(referral),
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            referral: None,
            error: Some(reason.into()),
        }
    }
}
