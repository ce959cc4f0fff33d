use triage_types::{AlertSeverity, ReferralDecision};
use uuid::Uuid;

/// Render the emergency alert message sent to the receiving facility.
pub fn build_alert_message(
    patient_id: Uuid,
    referral: &ReferralDecision,
    severity: AlertSeverity,
    symptoms_summary: &str,
) -> String {
    format!(
        "VHT CO-PILOT EMERGENCY ALERT\n\
\n\
Patient: {}\n\
Ref Code: {}\n\
Severity: {}\n\
Symptoms: {}\n\
Hospital: {}\n\
ETA: {} minutes\n\
\n\
Prepare for arrival.",
        patient_id,
        referral.referral_id,
        severity.as_str(),
        symptoms_summary,
        referral.hospital_name,
        referral.travel_time_minutes
    )
}
