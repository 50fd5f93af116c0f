//! HTTP handlers for vetclinic-service.

pub mod auth;
pub mod clients;
pub mod clinical;
pub mod communications;
pub mod dashboard;
pub mod health;
pub mod overview;
pub mod patients;
pub mod scheduling;

use axum::http::Method;
use service_core::error::AppError;

use crate::authz::{AccessPolicy, ResourceKind};
use crate::middleware::AuthPrincipal;
use crate::services::metrics::ACCESS_DENIED_TOTAL;

/// Run the role/method policy for one request. Denials are counted and
/// surface as 403.
pub(crate) fn authorize(
    principal: AuthPrincipal,
    kind: ResourceKind,
    method: Method,
) -> Result<(), AppError> {
    if AccessPolicy::allows(Some(principal.role), kind, &method) {
        return Ok(());
    }

    if let Some(counter) = ACCESS_DENIED_TOTAL.get() {
        counter
            .with_label_values(&[kind.as_str(), principal.role.as_str()])
            .inc();
    }

    Err(AppError::Forbidden(anyhow::anyhow!(
        "Role {} may not modify {} records",
        principal.role.as_str(),
        kind.as_str()
    )))
}
