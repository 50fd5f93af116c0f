//! Principal model for vetclinic-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. A principal is created with exactly one role and keeps it
/// for life; there is no promotion path between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Client => "client",
        }
    }

    /// Strict parse. Unknown role strings are rejected rather than mapped
    /// to a default, so a corrupted row can never widen access.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "doctor" => Some(Role::Doctor),
            "client" => Some(Role::Client),
            _ => None,
        }
    }
}

/// An authenticated account. `password_hash` never leaves the service.
/// Staff names live here; client display names live on the client record.
#[derive(Debug, Clone, FromRow)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Principal {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_string() {
        assert_eq!(Role::parse(Role::Doctor.as_str()), Some(Role::Doctor));
        assert_eq!(Role::parse(Role::Client.as_str()), Some(Role::Client));
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Doctor"), None);
    }
}
