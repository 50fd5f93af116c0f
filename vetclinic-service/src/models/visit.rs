//! Visit model for vetclinic-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Visit status label. The three values come from the practice's intake
/// workflow; no transition order is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    #[serde(rename = "Checked-in")]
    CheckedIn,
    #[serde(rename = "Ready for discharge")]
    ReadyForDischarge,
    #[serde(rename = "Discharged")]
    Discharged,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::CheckedIn => "Checked-in",
            VisitStatus::ReadyForDischarge => "Ready for discharge",
            VisitStatus::Discharged => "Discharged",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "Ready for discharge" => VisitStatus::ReadyForDischarge,
            "Discharged" => VisitStatus::Discharged,
            _ => VisitStatus::CheckedIn,
        }
    }
}

/// A clinical visit; anchors vitals, medications, notes and treatment plans.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Visit {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub veterinarian: Option<String>,
    pub visit_date: DateTime<Utc>,
    pub visit_status: String,
    pub location_status: Option<String>,
    pub age_months: Option<i32>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for recording a visit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVisit {
    pub patient_id: Uuid,
    pub veterinarian: Option<String>,
    pub visit_date: DateTime<Utc>,
    #[serde(default = "default_visit_status")]
    pub visit_status: VisitStatus,
    pub location_status: Option<String>,
    pub age_months: Option<i32>,
    pub notes: Option<String>,
}

fn default_visit_status() -> VisitStatus {
    VisitStatus::CheckedIn
}

/// Mutable visit fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVisit {
    pub veterinarian: Option<String>,
    pub visit_date: DateTime<Utc>,
    pub visit_status: VisitStatus,
    pub location_status: Option<String>,
    pub age_months: Option<i32>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in [
            VisitStatus::CheckedIn,
            VisitStatus::ReadyForDischarge,
            VisitStatus::Discharged,
        ] {
            assert_eq!(VisitStatus::from_string(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_checked_in() {
        assert_eq!(VisitStatus::from_string("Triage"), VisitStatus::CheckedIn);
    }
}
