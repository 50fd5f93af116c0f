//! Clinical record models anchored to a visit or patient.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vital signs recorded during a visit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VitalSigns {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub weight_lbs: Option<Decimal>,
    pub weight_oz: Option<Decimal>,
    pub temperature: Option<Decimal>,
    pub respiration: Option<i32>,
    pub heart_rate: Option<i32>,
    pub recorded_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVitalSigns {
    pub visit_id: Uuid,
    pub weight_lbs: Option<Decimal>,
    pub weight_oz: Option<Decimal>,
    pub temperature: Option<Decimal>,
    pub respiration: Option<i32>,
    pub heart_rate: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVitalSigns {
    pub weight_lbs: Option<Decimal>,
    pub weight_oz: Option<Decimal>,
    pub temperature: Option<Decimal>,
    pub respiration: Option<i32>,
    pub heart_rate: Option<i32>,
}

/// Allergy alert attached directly to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AllergyAlert {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub description: String,
    pub severity_level: Option<String>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAllergyAlert {
    pub patient_id: Uuid,
    pub description: String,
    pub severity_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAllergyAlert {
    pub description: String,
    pub severity_level: Option<String>,
}

/// Free-text clinical note taken during a visit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClinicalNote {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub note: String,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClinicalNote {
    pub visit_id: Uuid,
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClinicalNote {
    pub note: String,
}

/// Medication prescribed during a visit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Medication {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedication {
    pub visit_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

/// Treatment plan from a visit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TreatmentPlan {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub diagnosis: String,
    pub treatment_description: String,
    pub follow_up_date: Option<NaiveDate>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTreatmentPlan {
    pub visit_id: Uuid,
    pub diagnosis: String,
    pub treatment_description: String,
    pub follow_up_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTreatmentPlan {
    pub diagnosis: String,
    pub treatment_description: String,
    pub follow_up_date: Option<NaiveDate>,
}

/// Certificate or referral filed for a patient. `file_ref` points into
/// external document storage and is never interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub document_type: String,
    pub file_ref: String,
    pub issued_date: NaiveDate,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub patient_id: Uuid,
    pub document_type: String,
    pub file_ref: String,
    pub issued_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocument {
    pub document_type: String,
    pub file_ref: String,
    pub issued_date: NaiveDate,
}
