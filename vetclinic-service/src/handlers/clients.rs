//! Client profile handlers.
//!
//! Client rows are created by registration, so the collection only
//! supports read, update and delete.

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
use crate::models::UpdateClient;
use crate::AppState;

/// GET /api/clients
pub async fn list_clients(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Client, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let clients = state.db.list_clients(&scope).await?;
    Ok(Json(clients))
}

/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Client, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let client = state
        .db
        .get_client(&scope, id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    Ok(Json(client))
}

/// PUT /api/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateClient>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Client, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let client = state
        .db
        .update_client(&scope, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
    Ok(Json(client))
}

/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Client, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_client(&scope, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Client not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
