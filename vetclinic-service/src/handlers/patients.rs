//! Patient handlers. Both roles may write; ownership on create is
//! server-assigned for client callers.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::authorize;
use crate::authz::{ResourceKind, ScopeFilter};
use crate::middleware::AuthPrincipal;
use crate::models::{CreatePatient, UpdatePatient};
use crate::AppState;

/// GET /api/patients
pub async fn list_patients(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Patient, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let patients = state.db.list_patients(&scope).await?;
    Ok(Json(patients))
}

/// POST /api/patients
///
/// A client caller always becomes the owner regardless of the payload;
/// a doctor must name the owning client explicitly.
pub async fn create_patient(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreatePatient>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Patient, Method::POST)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;

    let owner = ScopeFilter::owner_for_create(&scope, input.client_id).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "A patient must be created under a client record"
        ))
    })?;

    let patient = state.db.create_patient(owner, &input).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// GET /api/patients/:id
pub async fn get_patient(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Patient, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let patient = state
        .db
        .get_patient(&scope, id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient not found")))?;
    Ok(Json(patient))
}

/// PUT /api/patients/:id
pub async fn update_patient(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePatient>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Patient, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let patient = state
        .db
        .update_patient(&scope, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient not found")))?;
    Ok(Json(patient))
}

/// DELETE /api/patients/:id
pub async fn delete_patient(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Patient, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_patient(&scope, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Patient not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
