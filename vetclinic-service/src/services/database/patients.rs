//! Patient storage operations.

use super::{insert_err, query_err, Database};
use crate::authz::{OwnershipScope, ResourceKind, ScopeFilter};
use crate::models::{CreatePatient, Patient, UpdatePatient};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const PATIENT_COLS: &str = "id, client_id, name, species, breed, gender, color, \
     date_of_birth, weight_kg, photo_ref, created_utc, updated_utc";

impl Database {
    pub async fn list_patients(&self, scope: &OwnershipScope) -> Result<Vec<Patient>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_patients"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Patient, scope);
        let sql = format!(
            "SELECT {PATIENT_COLS} FROM patients WHERE {} ORDER BY created_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Patient>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let patients = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Patient, "list", e))?;

        timer.observe_duration();
        Ok(patients)
    }

    /// Create a patient under `owner`. The owner is resolved by the caller
    /// from the creator's scope, never trusted from the payload.
    #[instrument(skip(self, input), fields(client_id = %owner))]
    pub async fn create_patient(
        &self,
        owner: Uuid,
        input: &CreatePatient,
    ) -> Result<Patient, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_patient"])
            .start_timer();

        let sql = format!(
            "INSERT INTO patients (id, client_id, name, species, breed, gender, color, \
             date_of_birth, weight_kg, photo_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {PATIENT_COLS}"
        );
        let patient = sqlx::query_as::<_, Patient>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(&input.name)
            .bind(&input.species)
            .bind(&input.breed)
            .bind(&input.gender)
            .bind(&input.color)
            .bind(input.date_of_birth)
            .bind(input.weight_kg)
            .bind(&input.photo_ref)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::Patient, e))?;

        timer.observe_duration();
        info!(patient_id = %patient.id, name = %patient.name, "Patient created");

        Ok(patient)
    }

    pub async fn get_patient(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Patient>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Patient, scope);
        let sql = format!(
            "SELECT {PATIENT_COLS} FROM patients WHERE ({}) AND id = {}",
            filter.clause,
            filter.next_placeholder()
        );

        let mut query = sqlx::query_as::<_, Patient>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Patient, "get", e))
    }

    pub async fn update_patient(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdatePatient,
    ) -> Result<Option<Patient>, AppError> {
        if self.get_patient(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE patients SET name = $1, species = $2, breed = $3, gender = $4, \
             color = $5, date_of_birth = $6, weight_kg = $7, photo_ref = $8, \
             updated_utc = NOW() WHERE id = $9 RETURNING {PATIENT_COLS}"
        );
        let patient = sqlx::query_as::<_, Patient>(&sql)
            .bind(&input.name)
            .bind(&input.species)
            .bind(&input.breed)
            .bind(&input.gender)
            .bind(&input.color)
            .bind(input.date_of_birth)
            .bind(input.weight_kg)
            .bind(&input.photo_ref)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Patient, "update", e))?;

        Ok(Some(patient))
    }

    /// Delete a patient. Cascades to visits and their subtrees.
    pub async fn delete_patient(&self, scope: &OwnershipScope, id: Uuid) -> Result<bool, AppError> {
        if self.get_patient(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Patient, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
