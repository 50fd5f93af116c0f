//! Request and response DTOs for vetclinic-service.

use serde::Serialize;

pub mod auth;

pub use auth::{
    LoginRequest, LoginResponse, RegisterClientRequest, RegisterDoctorRequest, RegisterResponse,
    UserSummary,
};

/// Uniform error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
