use crate::{haversine_km, HospitalDirectory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use triage_types::{Hospital, TriageLevel};
use uuid::Uuid;

/// Resource matcher tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Cost penalty per active referral, in kilometer-equivalents.
    pub load_weight: f64,
    /// Assumed average transport speed.
    pub assumed_speed_kmh: f64,
    /// Floor on any coordinate-based travel estimate.
    pub minimum_travel_minutes: u32,
    /// Estimate used when the patient's location is unknown.
    pub default_travel_minutes: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            load_weight: 2.0,
            assumed_speed_kmh: 30.0,
            minimum_travel_minutes: 15,
            default_travel_minutes: 30,
        }
    }
}

impl MatcherConfig {
    /// Load configuration from environment variables, keeping defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            load_weight: std::env::var("MATCHER_LOAD_WEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.load_weight),
            assumed_speed_kmh: std::env::var("MATCHER_SPEED_KMH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.assumed_speed_kmh),
            minimum_travel_minutes: std::env::var("MATCHER_MIN_TRAVEL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.minimum_travel_minutes),
            default_travel_minutes: std::env::var("MATCHER_DEFAULT_TRAVEL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_travel_minutes),
        }
    }
}

/// Selects the best available hospital for a referral.
pub struct ResourceMatcher {
    directory: Arc<dyn HospitalDirectory>,
    config: MatcherConfig,
}

impl ResourceMatcher {
    pub fn new(directory: Arc<dyn HospitalDirectory>, config: MatcherConfig) -> Self {
        Self { directory, config }
    }

    /// Find the best hospital for the requested specialty without claiming
    /// a slot.
    ///
    /// Filters to operational, non-full facilities with the specialty;
    /// widens to any operational non-full facility when none match; returns
    /// `None` when truly no candidate exists. With no patient location the
    /// globally least-loaded candidate wins; otherwise minimum
    /// `distance_km + active_referrals * load_weight`. Ties keep registry
    /// order.
    pub async fn find_best_hospital(
        &self,
        location: Option<(f64, f64)>,
        specialty: &str,
        urgency: TriageLevel,
    ) -> Option<Hospital> {
        let candidates = self.candidates(specialty).await;
        if candidates.is_empty() {
            warn!(specialty, ?urgency, "no available hospitals found");
            return None;
        }
        self.select(&candidates, location, &[])
    }

    /// Find the best hospital and atomically claim a referral slot on it.
    ///
    /// When the winning candidate's claim fails (a concurrent referral took
    /// its last slot after our snapshot), selection reruns without it until
    /// a claim succeeds or candidates run out.
    pub async fn assign_hospital(
        &self,
        location: Option<(f64, f64)>,
        specialty: &str,
        urgency: TriageLevel,
    ) -> Option<Hospital> {
        let candidates = self.candidates(specialty).await;
        if candidates.is_empty() {
            warn!(specialty, ?urgency, "no available hospitals found");
            return None;
        }

        let mut excluded: Vec<Uuid> = Vec::new();
        while excluded.len() < candidates.len() {
            let chosen = self.select(&candidates, location, &excluded)?;
            if self.directory.claim_slot(chosen.id).await {
                // Re-read so the caller sees the post-claim counter.
                return self.directory.get(chosen.id).await.or(Some(chosen));
            }
            debug!(hospital = %chosen.name, "slot claim lost race, reselecting");
            excluded.push(chosen.id);
        }

        warn!(specialty, "every candidate saturated during claim");
        None
    }

    /// Travel time estimate in minutes.
    pub fn estimate_travel_time(
        &self,
        patient_location: Option<(f64, f64)>,
        hospital_location: (f64, f64),
    ) -> u32 {
        match patient_location {
            Some(patient) => {
                let km = haversine_km(patient, hospital_location);
                let minutes = (km / self.config.assumed_speed_kmh * 60.0).round() as u32;
                minutes.max(self.config.minimum_travel_minutes)
            }
            None => self.config.default_travel_minutes,
        }
    }

    async fn candidates(&self, specialty: &str) -> Vec<Hospital> {
        let matched = self
            .directory
            .find_operational(Some(specialty), true)
            .await;
        if !matched.is_empty() {
            return matched;
        }
        // Widen: any operational, non-full facility.
        self.directory.find_operational(None, true).await
    }

    fn select(
        &self,
        candidates: &[Hospital],
        location: Option<(f64, f64)>,
        excluded: &[Uuid],
    ) -> Option<Hospital> {
        let eligible: Vec<&Hospital> = candidates
            .iter()
            .filter(|h| !excluded.contains(&h.id))
            .collect();

        match location {
            // Stable minimum: strictly-less replacement keeps input order
            // on ties.
            None => eligible
                .iter()
                .copied()
                .fold(None::<&Hospital>, |best, h| match best {
                    Some(b) if h.active_referrals < b.active_referrals => Some(h),
                    Some(b) => Some(b),
                    None => Some(h),
                })
                .cloned(),
            Some(patient) => {
                let mut best: Option<(f64, &Hospital)> = None;
                for hospital in eligible.iter().copied() {
                    let cost = haversine_km(patient, hospital.location())
                        + f64::from(hospital.active_referrals) * self.config.load_weight;
                    if !cost.is_finite() {
                        continue;
                    }
                    match best {
                        Some((best_cost, _)) if cost < best_cost => {
                            best = Some((cost, hospital));
                        }
                        None => best = Some((cost, hospital)),
                        _ => {}
                    }
                }
                // Degenerate coordinates everywhere: degrade to the first
                // candidate rather than failing the referral.
                best.map(|(_, h)| h.clone())
                    .or_else(|| eligible.first().map(|h| (**h).clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryHospitalDirectory;
    use triage_types::CapacityStatus;

    fn hospital(name: &str, lat: f64, lon: f64, load: u32) -> Hospital {
        Hospital {
            id: Uuid::new_v4(),
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            phone_number: "+256700000000".to_string(),
            specialties: vec!["general".to_string(), "emergency".to_string()],
            capacity_status: CapacityStatus::Available,
            active_referrals: load,
            max_capacity: 50,
            is_operational: true,
        }
    }

    fn matcher(hospitals: Vec<Hospital>) -> ResourceMatcher {
        ResourceMatcher::new(
            Arc::new(InMemoryHospitalDirectory::new(hospitals)),
            MatcherConfig::default(),
        )
    }

    #[tokio::test]
    async fn never_selects_non_operational_or_full_hospitals() {
        let mut closed = hospital("Closed", 0.3, 32.5, 0);
        closed.is_operational = false;
        let mut full = hospital("Full", 0.3, 32.5, 0);
        full.capacity_status = CapacityStatus::Full;
        let mut saturated = hospital("Saturated", 0.3, 32.5, 50);
        saturated.active_referrals = saturated.max_capacity;
        let open = hospital("Open", 5.0, 30.0, 10);

        let m = matcher(vec![closed, full, saturated, open]);
        let best = m
            .find_best_hospital(Some((0.3, 32.5)), "general", TriageLevel::Urgent)
            .await
            .unwrap();
        assert_eq!(best.name, "Open");
    }

    #[tokio::test]
    async fn equidistant_hospitals_prefer_lower_load() {
        let a = hospital("Busy", 0.4, 32.6, 8);
        let b = hospital("Quiet", 0.4, 32.6, 2);
        let m = matcher(vec![a, b]);
        let best = m
            .find_best_hospital(Some((0.3, 32.5)), "general", TriageLevel::Urgent)
            .await
            .unwrap();
        assert_eq!(best.name, "Quiet");
    }

    #[tokio::test]
    async fn no_location_selects_globally_lowest_load() {
        let a = hospital("A", 0.4, 32.6, 3);
        let b = hospital("B", 9.9, 40.0, 1);
        let c = hospital("C", 0.4, 32.6, 1);
        let m = matcher(vec![a, b, c]);
        let best = m
            .find_best_hospital(None, "general", TriageLevel::Urgent)
            .await
            .unwrap();
        // B and C tie on load; B comes first in registry order.
        assert_eq!(best.name, "B");
    }

    #[tokio::test]
    async fn unmatched_specialty_widens_to_any_operational() {
        let m = matcher(vec![hospital("General", 0.4, 32.6, 0)]);
        let best = m
            .find_best_hospital(None, "neurosurgery", TriageLevel::Urgent)
            .await;
        assert_eq!(best.unwrap().name, "General");
    }

    #[tokio::test]
    async fn empty_registry_yields_none() {
        let m = matcher(Vec::new());
        assert!(m
            .find_best_hospital(None, "general", TriageLevel::Urgent)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn assignment_increments_the_load_counter() {
        let h = hospital("Target", 0.4, 32.6, 0);
        let id = h.id;
        let directory = Arc::new(InMemoryHospitalDirectory::new(vec![h]));
        let m = ResourceMatcher::new(directory.clone(), MatcherConfig::default());

        let assigned = m
            .assign_hospital(None, "general", TriageLevel::Urgent)
            .await
            .unwrap();
        assert_eq!(assigned.active_referrals, 1);
        assert_eq!(directory.get(id).await.unwrap().active_referrals, 1);
    }

    #[tokio::test]
    async fn concurrent_claims_cannot_exceed_capacity() {
        let mut h = hospital("LastSlot", 0.4, 32.6, 49);
        h.max_capacity = 50;
        let directory = Arc::new(InMemoryHospitalDirectory::new(vec![h]));

        let mut claims = Vec::new();
        for _ in 0..2 {
            let m = ResourceMatcher::new(directory.clone(), MatcherConfig::default());
            claims.push(tokio::spawn(async move {
                m.assign_hospital(None, "general", TriageLevel::Urgent).await
            }));
        }

        let mut successes = 0;
        for claim in claims {
            if claim.await.unwrap().is_some() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn travel_time_has_a_floor_and_a_default() {
        let m = matcher(Vec::new());
        // Adjacent points: raw estimate under the 15 minute floor.
        assert_eq!(
            m.estimate_travel_time(Some((0.30, 32.50)), (0.31, 32.50)),
            15
        );
        // Roughly 35 km at 30 km/h is about 70 minutes.
        let minutes = m.estimate_travel_time(Some((0.3476, 32.5825)), (0.0512, 32.4637));
        assert!((60..=80).contains(&minutes), "got {minutes}");
        // Unknown location falls back to the fixed default.
        assert_eq!(m.estimate_travel_time(None, (0.31, 32.50)), 30);
    }
}
