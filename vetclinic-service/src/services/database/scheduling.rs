//! Appointment and receipt storage operations, plus the aggregate queries
//! behind the dashboard.

use super::{insert_err, query_err, Database};
use crate::authz::{OwnershipScope, ResourceKind, ScopeFilter};
use crate::models::{
    Appointment, CreateAppointment, CreateReceipt, Receipt, UpdateAppointment, UpdateReceipt,
};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

const APPOINTMENT_COLS: &str = "id, client_id, patient_id, date, reason, created_utc";
const RECEIPT_COLS: &str = "id, client_id, amount, date, status, created_utc";

impl Database {
    // =========================================================================
    // Appointment Operations
    // =========================================================================

    pub async fn list_appointments(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<Appointment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_appointments"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Appointment, scope);
        let sql = format!(
            "SELECT {APPOINTMENT_COLS} FROM appointments WHERE {} ORDER BY date",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Appointment>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let appointments = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Appointment, "list", e))?;

        timer.observe_duration();
        Ok(appointments)
    }

    /// Create an appointment under `owner`. Owner comes from the caller's
    /// scope; the handler has already checked the patient is in scope.
    #[instrument(skip(self, input), fields(client_id = %owner))]
    pub async fn create_appointment(
        &self,
        owner: Uuid,
        input: &CreateAppointment,
    ) -> Result<Appointment, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_appointment"])
            .start_timer();

        let sql = format!(
            "INSERT INTO appointments (id, client_id, patient_id, date, reason) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {APPOINTMENT_COLS}"
        );
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(input.patient_id)
            .bind(input.date)
            .bind(&input.reason)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::Appointment, e))?;

        timer.observe_duration();
        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Appointment>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Appointment, scope);
        let sql = format!(
            "SELECT {APPOINTMENT_COLS} FROM appointments WHERE ({}) AND id = {}",
            filter.clause,
            filter.next_placeholder()
        );

        let mut query = sqlx::query_as::<_, Appointment>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Appointment, "get", e))
    }

    pub async fn update_appointment(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, AppError> {
        if self.get_appointment(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE appointments SET date = $1, reason = $2 WHERE id = $3 \
             RETURNING {APPOINTMENT_COLS}"
        );
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(input.date)
            .bind(&input.reason)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Appointment, "update", e))?;

        Ok(Some(appointment))
    }

    pub async fn delete_appointment(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_appointment(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Appointment, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Receipt Operations
    // =========================================================================

    pub async fn list_receipts(&self, scope: &OwnershipScope) -> Result<Vec<Receipt>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_receipts"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Receipt, scope);
        let sql = format!(
            "SELECT {RECEIPT_COLS} FROM receipts WHERE {} ORDER BY date DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Receipt>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let receipts = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Receipt, "list", e))?;

        timer.observe_duration();
        Ok(receipts)
    }

    #[instrument(skip(self, input), fields(client_id = %owner))]
    pub async fn create_receipt(
        &self,
        owner: Uuid,
        input: &CreateReceipt,
    ) -> Result<Receipt, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_receipt"])
            .start_timer();

        let sql = format!(
            "INSERT INTO receipts (id, client_id, amount, date, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RECEIPT_COLS}"
        );
        let receipt = sqlx::query_as::<_, Receipt>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(input.amount)
            .bind(input.date)
            .bind(input.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::Receipt, e))?;

        timer.observe_duration();
        Ok(receipt)
    }

    pub async fn get_receipt(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Receipt>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Receipt, scope);
        let sql = format!(
            "SELECT {RECEIPT_COLS} FROM receipts WHERE ({}) AND id = {}",
            filter.clause,
            filter.next_placeholder()
        );

        let mut query = sqlx::query_as::<_, Receipt>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Receipt, "get", e))
    }

    pub async fn update_receipt(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateReceipt,
    ) -> Result<Option<Receipt>, AppError> {
        if self.get_receipt(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE receipts SET amount = $1, date = $2, status = $3 WHERE id = $4 \
             RETURNING {RECEIPT_COLS}"
        );
        let receipt = sqlx::query_as::<_, Receipt>(&sql)
            .bind(input.amount)
            .bind(input.date)
            .bind(input.status.as_str())
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Receipt, "update", e))?;

        Ok(Some(receipt))
    }

    pub async fn delete_receipt(&self, scope: &OwnershipScope, id: Uuid) -> Result<bool, AppError> {
        if self.get_receipt(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Receipt, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Dashboard Aggregates
    // =========================================================================

    /// Sum of receipt amounts visible under a scope. Empty scope sums to
    /// zero rather than NULL.
    #[instrument(skip(self, scope))]
    pub async fn receipts_total(&self, scope: &OwnershipScope) -> Result<Decimal, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["receipts_total"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Receipt, scope);
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0) FROM receipts WHERE {}",
            filter.clause
        );

        let mut query = sqlx::query_scalar::<_, Decimal>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let total = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Receipt, "sum", e))?;

        timer.observe_duration();
        Ok(total)
    }

    /// Count of receipts in scope marked paid.
    pub async fn receipts_paid_count(&self, scope: &OwnershipScope) -> Result<i64, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Receipt, scope);
        let sql = format!(
            "SELECT COUNT(*) FROM receipts WHERE ({}) AND status = 'Paid'",
            filter.clause
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Receipt, "count_paid", e))
    }

    /// Visit counts bucketed by calendar month, oldest first. Months with
    /// no visits produce no row.
    #[instrument(skip(self, scope))]
    pub async fn monthly_visit_counts(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<(DateTime<Utc>, i64)>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["monthly_visit_counts"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Visit, scope);
        let sql = format!(
            "SELECT date_trunc('month', visit_date) AS month, COUNT(*) \
             FROM visits WHERE {} GROUP BY 1 ORDER BY 1",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, (DateTime<Utc>, i64)>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let buckets = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Visit, "monthly_counts", e))?;

        timer.observe_duration();
        Ok(buckets)
    }
}
