//! Appointment model for vetclinic-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Scheduled appointment. Owned directly by a client; the referenced
/// patient must belong to the same client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Input for booking an appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointment {
    pub client_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Mutable appointment fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointment {
    pub date: DateTime<Utc>,
    pub reason: Option<String>,
}
