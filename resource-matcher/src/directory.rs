use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use triage_types::Hospital;
use uuid::Uuid;

/// Capability interface over the hospital registry.
///
/// `find_operational` returns snapshots in stable registry order; callers
/// must not assume the load counters stay fresh after the call. The only
/// write path is `claim_slot`, which must be atomic: a claim observes the
/// live counter and increments it in one step, so two concurrent referrals
/// cannot both take the last slot.
#[async_trait]
pub trait HospitalDirectory: Send + Sync {
    /// Operational hospitals, optionally filtered by specialty, optionally
    /// excluding facilities at full capacity.
    async fn find_operational(&self, specialty: Option<&str>, exclude_full: bool) -> Vec<Hospital>;

    /// Current snapshot of one hospital.
    async fn get(&self, id: Uuid) -> Option<Hospital>;

    /// Atomically claim one referral slot. Returns false when the hospital
    /// is unknown, non-operational, or already at capacity.
    async fn claim_slot(&self, id: Uuid) -> bool;
}

/// In-memory hospital directory.
///
/// Production deployments back this trait with the facility registry; the
/// in-memory form serves tests and offline pilots. All mutation happens
/// under one lock, which is what makes `claim_slot` an atomic
/// check-and-increment rather than a read-then-write pair.
pub struct InMemoryHospitalDirectory {
    hospitals: RwLock<Vec<Hospital>>,
}

impl InMemoryHospitalDirectory {
    pub fn new(hospitals: Vec<Hospital>) -> Self {
        Self {
            hospitals: RwLock::new(hospitals),
        }
    }
}

#[async_trait]
impl HospitalDirectory for InMemoryHospitalDirectory {
    async fn find_operational(&self, specialty: Option<&str>, exclude_full: bool) -> Vec<Hospital> {
        self.hospitals
            .read()
            .iter()
            .filter(|h| h.is_operational)
            .filter(|h| !exclude_full || h.is_available())
            .filter(|h| specialty.map_or(true, |s| h.has_specialty(s)))
            .cloned()
            .collect()
    }

    async fn get(&self, id: Uuid) -> Option<Hospital> {
        self.hospitals.read().iter().find(|h| h.id == id).cloned()
    }

    async fn claim_slot(&self, id: Uuid) -> bool {
        let mut hospitals = self.hospitals.write();
        let Some(hospital) = hospitals.iter_mut().find(|h| h.id == id) else {
            return false;
        };
        if !hospital.is_available() {
            debug!(hospital = %hospital.name, "slot claim rejected, hospital saturated");
            return false;
        }
        hospital.active_referrals += 1;
        debug!(
            hospital = %hospital.name,
            active_referrals = hospital.active_referrals,
            "referral slot claimed"
        );
        true
    }
}
