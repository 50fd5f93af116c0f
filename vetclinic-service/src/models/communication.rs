//! Client communication log model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logged communication with a client (call, reminder, follow-up).
/// Written by staff; `saved_by` records the authoring principal and
/// survives as NULL if that account is later removed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommunicationNote {
    pub id: Uuid,
    pub client_id: Uuid,
    pub message: String,
    pub saved_by: Option<Uuid>,
    pub created_utc: DateTime<Utc>,
}

/// Input for logging a communication. Writes are staff-side, so the
/// target client is named explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommunicationNote {
    pub client_id: Uuid,
    pub message: String,
}

/// Mutable communication fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommunicationNote {
    pub message: String,
}
