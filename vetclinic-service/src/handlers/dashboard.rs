//! Dashboard handler.

use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::authz::{OwnershipScope, ResourceKind};
use crate::middleware::AuthPrincipal;
use crate::models::Role;
use crate::services::dashboard::{dashboard_tag, monthly_series, DashboardSummary};
use crate::AppState;

/// GET /api/dashboard
///
/// Counts, billing totals and the monthly visit series, all computed
/// under the caller's scope. A client-role caller with no linked client
/// record gets 404 rather than an all-zero clinic view.
pub async fn dashboard(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let scope = match principal.role {
        Role::Doctor => OwnershipScope::Global,
        Role::Client => {
            let client = state
                .db
                .find_client_by_principal(principal.id)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;
            OwnershipScope::Owned(client.id)
        }
    };

    let patients_count = state.db.count_scoped(ResourceKind::Patient, &scope).await?;
    let appointments_count = state
        .db
        .count_scoped(ResourceKind::Appointment, &scope)
        .await?;
    let receipts_count = state.db.count_scoped(ResourceKind::Receipt, &scope).await?;
    let receipts_total = state.db.receipts_total(&scope).await?;
    let receipts_paid_count = state.db.receipts_paid_count(&scope).await?;
    let monthly_visits = monthly_series(state.db.monthly_visit_counts(&scope).await?);

    Ok(Json(DashboardSummary {
        dashboard_for: dashboard_tag(principal.role),
        patients_count,
        appointments_count,
        receipts_count,
        receipts_total,
        receipts_paid_count,
        monthly_visits,
    }))
}
