//! Appointment and receipt handlers. Writes are client-only by policy;
//! ownership on create is server-assigned from the caller's scope.

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
use crate::models::{CreateAppointment, CreateReceipt, UpdateAppointment, UpdateReceipt};
use crate::AppState;

// =============================================================================
// Appointments
// =============================================================================

/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Appointment, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_appointments(&scope).await?))
}

/// POST /api/appointments
///
/// The named patient must be inside the caller's scope: a client cannot
/// book for someone else's animal by guessing an id.
pub async fn create_appointment(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateAppointment>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Appointment, Method::POST)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;

    let owner = ScopeFilter::owner_for_create(&scope, input.client_id).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "An appointment must be created under a client record"
        ))
    })?;

    if !state
        .db
        .exists_in_scope(ResourceKind::Patient, input.patient_id, &scope)
        .await?
    {
        return Err(AppError::NotFound(anyhow::anyhow!("Patient not found")));
    }

    let appointment = state.db.create_appointment(owner, &input).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/appointments/:id
pub async fn get_appointment(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Appointment, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let appointment = state
        .db
        .get_appointment(&scope, id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Appointment not found")))?;
    Ok(Json(appointment))
}

/// PUT /api/appointments/:id
pub async fn update_appointment(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateAppointment>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Appointment, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let appointment = state
        .db
        .update_appointment(&scope, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Appointment not found")))?;
    Ok(Json(appointment))
}

/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Appointment, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_appointment(&scope, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Appointment not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Receipts
// =============================================================================

/// GET /api/receipts
pub async fn list_receipts(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Receipt, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_receipts(&scope).await?))
}

/// POST /api/receipts
pub async fn create_receipt(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateReceipt>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Receipt, Method::POST)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;

    let owner = ScopeFilter::owner_for_create(&scope, input.client_id).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "A receipt must be created under a client record"
        ))
    })?;

    let receipt = state.db.create_receipt(owner, &input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/receipts/:id
pub async fn get_receipt(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Receipt, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let receipt = state
        .db
        .get_receipt(&scope, id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;
    Ok(Json(receipt))
}

/// PUT /api/receipts/:id
pub async fn update_receipt(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateReceipt>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Receipt, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let receipt = state
        .db
        .update_receipt(&scope, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Receipt not found")))?;
    Ok(Json(receipt))
}

/// DELETE /api/receipts/:id
pub async fn delete_receipt(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Receipt, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_receipt(&scope, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Receipt not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
