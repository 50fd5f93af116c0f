//! Account registration and login.
//!
//! Registration hashes the password up front, then hands both inserts to
//! the storage layer in one transaction. The pre-checks on username and
//! email exist for friendly errors only; the unique constraints decide
//! races.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::dtos::{LoginRequest, RegisterClientRequest, RegisterDoctorRequest};
use crate::models::{Client, Principal, Role};
use crate::services::database::Database;
use crate::services::metrics::REGISTRATIONS_TOTAL;
use crate::services::password::{hash_password, verify_password};
use crate::services::{JwtService, ServiceError};
use service_core::error::AppError;

#[derive(Clone)]
pub struct RegistrationService {
    db: Arc<Database>,
}

impl RegistrationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a client account: one principal plus its linked client
    /// profile, atomically.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register_client(
        &self,
        req: &RegisterClientRequest,
    ) -> Result<(Principal, Client), AppError> {
        self.check_availability(&req.username, &req.email).await?;

        let password_hash = hash_password(&req.password).map_err(AppError::from)?;
        let (principal, client) = self
            .db
            .create_client_account(
                &req.username,
                &req.email,
                &password_hash,
                &req.full_name,
                &req.phone,
            )
            .await?;

        if let Some(counter) = REGISTRATIONS_TOTAL.get() {
            counter.with_label_values(&[Role::Client.as_str()]).inc();
        }
        info!(principal_id = %principal.id, "Client registered");

        Ok((principal, client))
    }

    /// Register a doctor account. No client profile is created.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register_doctor(
        &self,
        req: &RegisterDoctorRequest,
    ) -> Result<Principal, AppError> {
        self.check_availability(&req.username, &req.email).await?;

        let password_hash = hash_password(&req.password).map_err(AppError::from)?;
        let principal = self
            .db
            .create_doctor_account(
                &req.username,
                &req.email,
                &password_hash,
                &req.first_name,
                &req.last_name,
            )
            .await?;

        if let Some(counter) = REGISTRATIONS_TOTAL.get() {
            counter.with_label_values(&[Role::Doctor.as_str()]).inc();
        }
        info!(principal_id = %principal.id, "Doctor registered");

        Ok(principal)
    }

    /// Authenticate against one portal. A valid credential presented to
    /// the wrong portal is rejected with a portal error, not treated as a
    /// bad password.
    #[instrument(skip(self, jwt, req), fields(username = %req.username))]
    pub async fn login(
        &self,
        jwt: &JwtService,
        req: &LoginRequest,
        expected_role: Role,
    ) -> Result<(Principal, String), AppError> {
        let principal = self
            .db
            .find_principal_by_username(&req.username)
            .await?
            .ok_or_else(|| AppError::from(ServiceError::InvalidCredentials))?;

        if !verify_password(&req.password, &principal.password_hash) {
            warn!(username = %req.username, "Failed login attempt");
            return Err(ServiceError::InvalidCredentials.into());
        }

        let role = principal
            .role()
            .ok_or_else(|| AppError::from(ServiceError::InvalidCredentials))?;
        if role != expected_role {
            let msg = match expected_role {
                Role::Client => "This login is for clients only",
                Role::Doctor => "This login is for doctors only",
            };
            return Err(ServiceError::WrongPortal(msg).into());
        }

        let token = jwt
            .issue_access_token(principal.id, role)
            .map_err(AppError::from)?;

        info!(principal_id = %principal.id, role = role.as_str(), "Login succeeded");
        Ok((principal, token))
    }

    async fn check_availability(&self, username: &str, email: &str) -> Result<(), AppError> {
        if self.db.username_exists(username).await? {
            return Err(ServiceError::DuplicateUsername.into());
        }
        if self.db.email_exists(email).await? {
            return Err(ServiceError::DuplicateEmail.into());
        }
        Ok(())
    }
}
