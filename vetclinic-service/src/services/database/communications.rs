//! Client communication log storage operations.

use super::{insert_err, query_err, Database};
use crate::authz::{OwnershipScope, ResourceKind, ScopeFilter};
use crate::models::{CommunicationNote, CreateCommunicationNote, UpdateCommunicationNote};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

const COMMUNICATION_COLS: &str = "id, client_id, message, saved_by, created_utc";

impl Database {
    pub async fn list_communication_notes(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<CommunicationNote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_communication_notes"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::CommunicationNote, scope);
        let sql = format!(
            "SELECT {COMMUNICATION_COLS} FROM communication_notes WHERE {} \
             ORDER BY created_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, CommunicationNote>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let notes = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::CommunicationNote, "list", e))?;

        timer.observe_duration();
        Ok(notes)
    }

    /// Log a communication. `saved_by` is the authoring principal.
    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create_communication_note(
        &self,
        saved_by: Uuid,
        input: &CreateCommunicationNote,
    ) -> Result<CommunicationNote, AppError> {
        let sql = format!(
            "INSERT INTO communication_notes (id, client_id, message, saved_by) \
             VALUES ($1, $2, $3, $4) RETURNING {COMMUNICATION_COLS}"
        );
        sqlx::query_as::<_, CommunicationNote>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.client_id)
            .bind(&input.message)
            .bind(saved_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::CommunicationNote, e))
    }

    pub async fn get_communication_note(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<CommunicationNote>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::CommunicationNote, scope);
        let sql = format!(
            "SELECT {COMMUNICATION_COLS} FROM communication_notes WHERE ({}) AND id = {}",
            filter.clause,
            filter.next_placeholder()
        );

        let mut query = sqlx::query_as::<_, CommunicationNote>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::CommunicationNote, "get", e))
    }

    pub async fn update_communication_note(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateCommunicationNote,
    ) -> Result<Option<CommunicationNote>, AppError> {
        if self.get_communication_note(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE communication_notes SET message = $1 WHERE id = $2 \
             RETURNING {COMMUNICATION_COLS}"
        );
        let note = sqlx::query_as::<_, CommunicationNote>(&sql)
            .bind(&input.message)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::CommunicationNote, "update", e))?;

        Ok(Some(note))
    }

    pub async fn delete_communication_note(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_communication_note(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM communication_notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::CommunicationNote, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
