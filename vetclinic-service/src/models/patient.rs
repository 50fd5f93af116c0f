//! Patient (animal) model for vetclinic-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Animal under care; root of the medical subtree owned by one client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub gender: String,
    pub color: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub weight_kg: Option<Decimal>,
    /// Opaque reference into external photo storage; stored, never validated.
    pub photo_ref: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for registering a new patient. `client_id` is advisory: for
/// client-role creators the owning client is server-assigned from the
/// caller's scope and any payload value is discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatient {
    pub client_id: Option<Uuid>,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub gender: String,
    pub color: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub weight_kg: Option<Decimal>,
    pub photo_ref: Option<String>,
}

/// Mutable patient fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePatient {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub gender: String,
    pub color: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub weight_kg: Option<Decimal>,
    pub photo_ref: Option<String>,
}
