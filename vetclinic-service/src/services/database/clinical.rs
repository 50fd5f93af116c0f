//! Clinical record storage operations: visits and everything anchored to
//! them, plus patient-level allergies and documents.

use super::{insert_err, query_err, Database};
use crate::authz::{OwnershipScope, ResourceKind, ScopeFilter};
use crate::models::{
    AllergyAlert, ClinicalNote, CreateAllergyAlert, CreateClinicalNote, CreateDocument,
    CreateMedication, CreateTreatmentPlan, CreateVisit, CreateVitalSigns, Document, Medication,
    TreatmentPlan, UpdateAllergyAlert, UpdateClinicalNote, UpdateDocument, UpdateMedication,
    UpdateTreatmentPlan, UpdateVisit, UpdateVitalSigns, Visit, VitalSigns,
};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

const VISIT_COLS: &str = "id, patient_id, veterinarian, visit_date, visit_status, \
     location_status, age_months, notes, created_utc";
const VITALS_COLS: &str =
    "id, visit_id, weight_lbs, weight_oz, temperature, respiration, heart_rate, recorded_utc";
const ALLERGY_COLS: &str = "id, patient_id, description, severity_level, created_utc";
const NOTE_COLS: &str = "id, visit_id, note, created_utc";
const MEDICATION_COLS: &str = "id, visit_id, name, dosage, frequency, duration, notes, created_utc";
const TREATMENT_COLS: &str =
    "id, visit_id, diagnosis, treatment_description, follow_up_date, created_utc";
const DOCUMENT_COLS: &str = "id, patient_id, document_type, file_ref, issued_date, created_utc";

/// Build a scoped SELECT for one row.
fn scoped_get_sql(cols: &str, table: &str, filter: &ScopeFilter) -> String {
    format!(
        "SELECT {cols} FROM {table} WHERE ({}) AND id = {}",
        filter.clause,
        filter.next_placeholder()
    )
}

impl Database {
    // =========================================================================
    // Visit Operations
    // =========================================================================

    pub async fn list_visits(&self, scope: &OwnershipScope) -> Result<Vec<Visit>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_visits"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Visit, scope);
        let sql = format!(
            "SELECT {VISIT_COLS} FROM visits WHERE {} ORDER BY visit_date DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Visit>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let visits = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Visit, "list", e))?;

        timer.observe_duration();
        Ok(visits)
    }

    #[instrument(skip(self, input), fields(patient_id = %input.patient_id))]
    pub async fn create_visit(&self, input: &CreateVisit) -> Result<Visit, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_visit"])
            .start_timer();

        let sql = format!(
            "INSERT INTO visits (id, patient_id, veterinarian, visit_date, visit_status, \
             location_status, age_months, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {VISIT_COLS}"
        );
        let visit = sqlx::query_as::<_, Visit>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.patient_id)
            .bind(&input.veterinarian)
            .bind(input.visit_date)
            .bind(input.visit_status.as_str())
            .bind(&input.location_status)
            .bind(input.age_months)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::Visit, e))?;

        timer.observe_duration();
        Ok(visit)
    }

    pub async fn get_visit(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Visit>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Visit, scope);
        let sql = scoped_get_sql(VISIT_COLS, "visits", &filter);

        let mut query = sqlx::query_as::<_, Visit>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Visit, "get", e))
    }

    pub async fn update_visit(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateVisit,
    ) -> Result<Option<Visit>, AppError> {
        if self.get_visit(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE visits SET veterinarian = $1, visit_date = $2, visit_status = $3, \
             location_status = $4, age_months = $5, notes = $6 WHERE id = $7 \
             RETURNING {VISIT_COLS}"
        );
        let visit = sqlx::query_as::<_, Visit>(&sql)
            .bind(&input.veterinarian)
            .bind(input.visit_date)
            .bind(input.visit_status.as_str())
            .bind(&input.location_status)
            .bind(input.age_months)
            .bind(&input.notes)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Visit, "update", e))?;

        Ok(Some(visit))
    }

    pub async fn delete_visit(&self, scope: &OwnershipScope, id: Uuid) -> Result<bool, AppError> {
        if self.get_visit(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Visit, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Vital Signs Operations
    // =========================================================================

    pub async fn list_vital_signs(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<VitalSigns>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_vital_signs"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::VitalSigns, scope);
        let sql = format!(
            "SELECT {VITALS_COLS} FROM vital_signs WHERE {} ORDER BY recorded_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, VitalSigns>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let vitals = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::VitalSigns, "list", e))?;

        timer.observe_duration();
        Ok(vitals)
    }

    pub async fn create_vital_signs(
        &self,
        input: &CreateVitalSigns,
    ) -> Result<VitalSigns, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_vital_signs"])
            .start_timer();

        let sql = format!(
            "INSERT INTO vital_signs (id, visit_id, weight_lbs, weight_oz, temperature, \
             respiration, heart_rate) VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {VITALS_COLS}"
        );
        let vitals = sqlx::query_as::<_, VitalSigns>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.visit_id)
            .bind(input.weight_lbs)
            .bind(input.weight_oz)
            .bind(input.temperature)
            .bind(input.respiration)
            .bind(input.heart_rate)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::VitalSigns, e))?;

        timer.observe_duration();
        Ok(vitals)
    }

    pub async fn get_vital_signs(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<VitalSigns>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::VitalSigns, scope);
        let sql = scoped_get_sql(VITALS_COLS, "vital_signs", &filter);

        let mut query = sqlx::query_as::<_, VitalSigns>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::VitalSigns, "get", e))
    }

    pub async fn update_vital_signs(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateVitalSigns,
    ) -> Result<Option<VitalSigns>, AppError> {
        if self.get_vital_signs(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE vital_signs SET weight_lbs = $1, weight_oz = $2, temperature = $3, \
             respiration = $4, heart_rate = $5 WHERE id = $6 RETURNING {VITALS_COLS}"
        );
        let vitals = sqlx::query_as::<_, VitalSigns>(&sql)
            .bind(input.weight_lbs)
            .bind(input.weight_oz)
            .bind(input.temperature)
            .bind(input.respiration)
            .bind(input.heart_rate)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::VitalSigns, "update", e))?;

        Ok(Some(vitals))
    }

    pub async fn delete_vital_signs(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_vital_signs(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM vital_signs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::VitalSigns, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Allergy Alert Operations
    // =========================================================================

    pub async fn list_allergy_alerts(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<AllergyAlert>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_allergy_alerts"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::AllergyAlert, scope);
        let sql = format!(
            "SELECT {ALLERGY_COLS} FROM allergy_alerts WHERE {} ORDER BY created_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, AllergyAlert>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let alerts = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::AllergyAlert, "list", e))?;

        timer.observe_duration();
        Ok(alerts)
    }

    pub async fn create_allergy_alert(
        &self,
        input: &CreateAllergyAlert,
    ) -> Result<AllergyAlert, AppError> {
        let sql = format!(
            "INSERT INTO allergy_alerts (id, patient_id, description, severity_level) \
             VALUES ($1, $2, $3, $4) RETURNING {ALLERGY_COLS}"
        );
        sqlx::query_as::<_, AllergyAlert>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.patient_id)
            .bind(&input.description)
            .bind(&input.severity_level)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::AllergyAlert, e))
    }

    pub async fn get_allergy_alert(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<AllergyAlert>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::AllergyAlert, scope);
        let sql = scoped_get_sql(ALLERGY_COLS, "allergy_alerts", &filter);

        let mut query = sqlx::query_as::<_, AllergyAlert>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::AllergyAlert, "get", e))
    }

    pub async fn update_allergy_alert(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateAllergyAlert,
    ) -> Result<Option<AllergyAlert>, AppError> {
        if self.get_allergy_alert(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE allergy_alerts SET description = $1, severity_level = $2 WHERE id = $3 \
             RETURNING {ALLERGY_COLS}"
        );
        let alert = sqlx::query_as::<_, AllergyAlert>(&sql)
            .bind(&input.description)
            .bind(&input.severity_level)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::AllergyAlert, "update", e))?;

        Ok(Some(alert))
    }

    pub async fn delete_allergy_alert(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_allergy_alert(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM allergy_alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::AllergyAlert, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Clinical Note Operations
    // =========================================================================

    pub async fn list_clinical_notes(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<ClinicalNote>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_clinical_notes"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::ClinicalNote, scope);
        let sql = format!(
            "SELECT {NOTE_COLS} FROM clinical_notes WHERE {} ORDER BY created_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, ClinicalNote>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let notes = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::ClinicalNote, "list", e))?;

        timer.observe_duration();
        Ok(notes)
    }

    pub async fn create_clinical_note(
        &self,
        input: &CreateClinicalNote,
    ) -> Result<ClinicalNote, AppError> {
        let sql = format!(
            "INSERT INTO clinical_notes (id, visit_id, note) VALUES ($1, $2, $3) \
             RETURNING {NOTE_COLS}"
        );
        sqlx::query_as::<_, ClinicalNote>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.visit_id)
            .bind(&input.note)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::ClinicalNote, e))
    }

    pub async fn get_clinical_note(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<ClinicalNote>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::ClinicalNote, scope);
        let sql = scoped_get_sql(NOTE_COLS, "clinical_notes", &filter);

        let mut query = sqlx::query_as::<_, ClinicalNote>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::ClinicalNote, "get", e))
    }

    pub async fn update_clinical_note(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateClinicalNote,
    ) -> Result<Option<ClinicalNote>, AppError> {
        if self.get_clinical_note(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE clinical_notes SET note = $1 WHERE id = $2 RETURNING {NOTE_COLS}"
        );
        let note = sqlx::query_as::<_, ClinicalNote>(&sql)
            .bind(&input.note)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::ClinicalNote, "update", e))?;

        Ok(Some(note))
    }

    pub async fn delete_clinical_note(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_clinical_note(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM clinical_notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::ClinicalNote, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Medication Operations
    // =========================================================================

    pub async fn list_medications(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<Medication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_medications"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Medication, scope);
        let sql = format!(
            "SELECT {MEDICATION_COLS} FROM medications WHERE {} ORDER BY created_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Medication>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let medications = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Medication, "list", e))?;

        timer.observe_duration();
        Ok(medications)
    }

    pub async fn create_medication(
        &self,
        input: &CreateMedication,
    ) -> Result<Medication, AppError> {
        let sql = format!(
            "INSERT INTO medications (id, visit_id, name, dosage, frequency, duration, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {MEDICATION_COLS}"
        );
        sqlx::query_as::<_, Medication>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.visit_id)
            .bind(&input.name)
            .bind(&input.dosage)
            .bind(&input.frequency)
            .bind(&input.duration)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::Medication, e))
    }

    pub async fn get_medication(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Medication>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Medication, scope);
        let sql = scoped_get_sql(MEDICATION_COLS, "medications", &filter);

        let mut query = sqlx::query_as::<_, Medication>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Medication, "get", e))
    }

    pub async fn update_medication(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateMedication,
    ) -> Result<Option<Medication>, AppError> {
        if self.get_medication(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE medications SET name = $1, dosage = $2, frequency = $3, duration = $4, \
             notes = $5 WHERE id = $6 RETURNING {MEDICATION_COLS}"
        );
        let medication = sqlx::query_as::<_, Medication>(&sql)
            .bind(&input.name)
            .bind(&input.dosage)
            .bind(&input.frequency)
            .bind(&input.duration)
            .bind(&input.notes)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Medication, "update", e))?;

        Ok(Some(medication))
    }

    pub async fn delete_medication(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_medication(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM medications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Medication, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Treatment Plan Operations
    // =========================================================================

    pub async fn list_treatment_plans(
        &self,
        scope: &OwnershipScope,
    ) -> Result<Vec<TreatmentPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_treatment_plans"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::TreatmentPlan, scope);
        let sql = format!(
            "SELECT {TREATMENT_COLS} FROM treatment_plans WHERE {} ORDER BY created_utc DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, TreatmentPlan>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let plans = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::TreatmentPlan, "list", e))?;

        timer.observe_duration();
        Ok(plans)
    }

    pub async fn create_treatment_plan(
        &self,
        input: &CreateTreatmentPlan,
    ) -> Result<TreatmentPlan, AppError> {
        let sql = format!(
            "INSERT INTO treatment_plans (id, visit_id, diagnosis, treatment_description, \
             follow_up_date) VALUES ($1, $2, $3, $4, $5) RETURNING {TREATMENT_COLS}"
        );
        sqlx::query_as::<_, TreatmentPlan>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.visit_id)
            .bind(&input.diagnosis)
            .bind(&input.treatment_description)
            .bind(input.follow_up_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::TreatmentPlan, e))
    }

    pub async fn get_treatment_plan(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<TreatmentPlan>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::TreatmentPlan, scope);
        let sql = scoped_get_sql(TREATMENT_COLS, "treatment_plans", &filter);

        let mut query = sqlx::query_as::<_, TreatmentPlan>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::TreatmentPlan, "get", e))
    }

    pub async fn update_treatment_plan(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateTreatmentPlan,
    ) -> Result<Option<TreatmentPlan>, AppError> {
        if self.get_treatment_plan(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE treatment_plans SET diagnosis = $1, treatment_description = $2, \
             follow_up_date = $3 WHERE id = $4 RETURNING {TREATMENT_COLS}"
        );
        let plan = sqlx::query_as::<_, TreatmentPlan>(&sql)
            .bind(&input.diagnosis)
            .bind(&input.treatment_description)
            .bind(input.follow_up_date)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::TreatmentPlan, "update", e))?;

        Ok(Some(plan))
    }

    pub async fn delete_treatment_plan(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_treatment_plan(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM treatment_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::TreatmentPlan, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    pub async fn list_documents(&self, scope: &OwnershipScope) -> Result<Vec<Document>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_documents"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Document, scope);
        let sql = format!(
            "SELECT {DOCUMENT_COLS} FROM documents WHERE {} ORDER BY issued_date DESC",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Document>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let documents = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Document, "list", e))?;

        timer.observe_duration();
        Ok(documents)
    }

    pub async fn create_document(&self, input: &CreateDocument) -> Result<Document, AppError> {
        let sql = format!(
            "INSERT INTO documents (id, patient_id, document_type, file_ref, issued_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {DOCUMENT_COLS}"
        );
        sqlx::query_as::<_, Document>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.patient_id)
            .bind(&input.document_type)
            .bind(&input.file_ref)
            .bind(input.issued_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_err(ResourceKind::Document, e))
    }

    pub async fn get_document(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Document>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Document, scope);
        let sql = scoped_get_sql(DOCUMENT_COLS, "documents", &filter);

        let mut query = sqlx::query_as::<_, Document>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Document, "get", e))
    }

    pub async fn update_document(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, AppError> {
        if self.get_document(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE documents SET document_type = $1, file_ref = $2, issued_date = $3 \
             WHERE id = $4 RETURNING {DOCUMENT_COLS}"
        );
        let document = sqlx::query_as::<_, Document>(&sql)
            .bind(&input.document_type)
            .bind(&input.file_ref)
            .bind(input.issued_date)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Document, "update", e))?;

        Ok(Some(document))
    }

    pub async fn delete_document(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<bool, AppError> {
        if self.get_document(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Document, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
