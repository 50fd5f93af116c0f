//! Database service for vetclinic-service.
//!
//! Every read and write that touches owned data goes through a
//! [`ScopeFilter`] predicate derived from one declarative ownership table,
//! so the storage layer can never answer outside the caller's scope.

mod clinical;
mod communications;
mod owners;
mod patients;
mod scheduling;

use crate::authz::{OwnershipScope, ResourceKind, ScopeFilter};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "vetclinic-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Count rows of one resource kind visible under a scope. Shared by
    /// the dashboard so its numbers always agree with the list endpoints.
    #[instrument(skip(self, scope), fields(resource = kind.as_str()))]
    pub async fn count_scoped(
        &self,
        kind: ResourceKind,
        scope: &OwnershipScope,
    ) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_scoped"])
            .start_timer();

        let filter = ScopeFilter::for_kind(kind, scope);
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            table_for(kind),
            filter.clause
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let count = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(kind, "count", e))?;

        timer.observe_duration();
        Ok(count)
    }

    /// Whether a row of `kind` exists inside the scope. Used to validate
    /// payload-supplied parent references on create.
    pub async fn exists_in_scope(
        &self,
        kind: ResourceKind,
        id: Uuid,
        scope: &OwnershipScope,
    ) -> Result<bool, AppError> {
        let filter = ScopeFilter::for_kind(kind, scope);
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE ({}) AND id = {})",
            table_for(kind),
            filter.clause,
            filter.next_placeholder()
        );

        let mut query = sqlx::query_scalar::<_, bool>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(kind, "exists", e))
    }
}

pub(crate) fn table_for(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Client => "clients",
        ResourceKind::Patient => "patients",
        ResourceKind::Appointment => "appointments",
        ResourceKind::Receipt => "receipts",
        ResourceKind::Visit => "visits",
        ResourceKind::VitalSigns => "vital_signs",
        ResourceKind::AllergyAlert => "allergy_alerts",
        ResourceKind::Document => "documents",
        ResourceKind::ClinicalNote => "clinical_notes",
        ResourceKind::Medication => "medications",
        ResourceKind::TreatmentPlan => "treatment_plans",
        ResourceKind::CommunicationNote => "communication_notes",
    }
}

pub(crate) fn query_err(kind: ResourceKind, op: &str, e: sqlx::Error) -> AppError {
    AppError::DatabaseError(anyhow::anyhow!(
        "Failed to {} {}: {}",
        op,
        kind.as_str(),
        e
    ))
}

/// Map insert failures: a foreign-key violation means the payload named a
/// parent row that does not exist, which is the caller's mistake.
pub(crate) fn insert_err(kind: ResourceKind, e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return AppError::BadRequest(anyhow::anyhow!(
                "{} references an unknown parent record",
                kind.as_str()
            ));
        }
    }
    query_err(kind, "create", e)
}
