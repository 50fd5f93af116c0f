//! Client communication log handlers.
//!
//! Staff record calls, reminders, and follow-ups against a client; the
//! client can read its own log but never edit it. Writes are doctor-only
//! by policy, and the author is stamped server-side from the token.

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::authorize;
use crate::authz::ResourceKind;
use crate::middleware::AuthPrincipal;
use crate::models::{CreateCommunicationNote, UpdateCommunicationNote};
use crate::AppState;

fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Communication note not found"))
}

/// GET /api/communications
pub async fn list_communication_notes(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::CommunicationNote, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_communication_notes(&scope).await?))
}

/// POST /api/communications
pub async fn create_communication_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateCommunicationNote>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::CommunicationNote, Method::POST)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state
        .db
        .exists_in_scope(ResourceKind::Client, input.client_id, &scope)
        .await?
    {
        return Err(AppError::NotFound(anyhow::anyhow!("Client not found")));
    }
    let note = state.db.create_communication_note(principal.id, &input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/communications/:id
pub async fn get_communication_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::CommunicationNote, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let note = state
        .db
        .get_communication_note(&scope, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(note))
}

/// PUT /api/communications/:id
pub async fn update_communication_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCommunicationNote>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::CommunicationNote, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let note = state
        .db
        .update_communication_note(&scope, id, &input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(note))
}

/// DELETE /api/communications/:id
pub async fn delete_communication_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::CommunicationNote, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_communication_note(&scope, id).await? {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
