//! Registration and login handlers.
//!
//! Clients and doctors register and log in through separate portals; a
//! valid credential presented to the wrong portal is rejected with 403.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::dtos::{
    LoginRequest, LoginResponse, RegisterClientRequest, RegisterDoctorRequest, RegisterResponse,
    UserSummary,
};
use crate::models::Role;
use crate::utils::ValidatedJson;
use crate::AppState;

/// POST /api/register
pub async fn register_client(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (principal, client) = state.registration.register_client(&req).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse::for_client(&principal, &client)),
    ))
}

/// POST /api/doctor/register
pub async fn register_doctor(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let principal = state.registration.register_doctor(&req).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse::for_doctor(&principal)),
    ))
}

/// POST /api/login
pub async fn login_client(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    login(state, req, Role::Client).await
}

/// POST /api/doctor/login
pub async fn login_doctor(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    login(state, req, Role::Doctor).await
}

async fn login(
    state: AppState,
    req: LoginRequest,
    expected_role: Role,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let (principal, access_token) = state
        .registration
        .login(&state.jwt, &req, expected_role)
        .await?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt.access_token_expiry_seconds(),
            user: UserSummary::new(&principal, expected_role),
        }),
    ))
}
