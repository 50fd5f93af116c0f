//! Authentication and registration DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Client, Principal, Role};

/// Client self-registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterClientRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 40, message = "Phone must be 1-40 characters"))]
    pub phone: String,
}

/// Doctor registration request. Doctors carry no client profile, so the
/// name is split the way staff records keep it.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDoctorRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
}

/// Login request, shared by both portals.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

/// Principal summary returned after login or registration. Never carries
/// the password hash.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserSummary {
    /// The role comes from the caller, which has already parsed it
    /// strictly; an unparseable stored role never reaches a response.
    pub fn new(p: &Principal, role: Role) -> Self {
        Self {
            id: p.id,
            username: p.username.clone(),
            email: p.email.clone(),
            role,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
        }
    }
}

/// Successful registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
}

impl RegisterResponse {
    pub fn for_client(principal: &Principal, client: &Client) -> Self {
        Self {
            user: UserSummary::new(principal, Role::Client),
            client_id: Some(client.id),
        }
    }

    pub fn for_doctor(principal: &Principal) -> Self {
        Self {
            user: UserSummary::new(principal, Role::Doctor),
            client_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn short_password_is_rejected() {
        let req = RegisterClientRequest {
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "short".to_string(),
            full_name: "Jane Doe".to_string(),
            phone: "555-0100".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn valid_client_registration_passes() {
        let req = RegisterClientRequest {
            username: "jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "a-long-password".to_string(),
            full_name: "Jane Doe".to_string(),
            phone: "555-0100".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bad_email_is_rejected() {
        let req = RegisterDoctorRequest {
            username: "drsmith".to_string(),
            email: "not-an-email".to_string(),
            password: "a-long-password".to_string(),
            first_name: "Alex".to_string(),
            last_name: "Smith".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn doctor_registration_response_carries_stored_names() {
        let principal = Principal {
            id: Uuid::new_v4(),
            username: "drsmith".to_string(),
            email: "drsmith@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: "doctor".to_string(),
            first_name: Some("Alex".to_string()),
            last_name: Some("Smith".to_string()),
            created_utc: chrono::Utc::now(),
        };
        let resp = RegisterResponse::for_doctor(&principal);
        assert_eq!(resp.user.first_name.as_deref(), Some("Alex"));
        assert_eq!(resp.user.last_name.as_deref(), Some("Smith"));
        assert_eq!(resp.client_id, None);
    }
}
