use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emergency intake capacity of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityStatus {
    Available,
    Limited,
    Full,
    EmergencyOnly,
}

/// A receiving health facility as seen by the resource matcher.
///
/// The matcher reads the operational flag, coordinates, specialty set and
/// load counter; `active_referrals` is the one piece of shared mutable state
/// the pipeline writes into, and that write goes through the directory's
/// atomic slot claim, never through this snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone_number: String,
    pub specialties: Vec<String>,
    pub capacity_status: CapacityStatus,
    /// Referrals currently assigned and not yet resolved.
    pub active_referrals: u32,
    pub max_capacity: u32,
    pub is_operational: bool,
}

impl Hospital {
    /// Whether the facility can accept another referral.
    pub fn is_available(&self) -> bool {
        self.is_operational
            && self.capacity_status != CapacityStatus::Full
            && self.active_referrals < self.max_capacity
    }

    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialties
            .iter()
            .any(|s| s.eq_ignore_ascii_case(specialty))
    }

    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
