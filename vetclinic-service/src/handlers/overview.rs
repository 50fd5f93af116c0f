//! Overview handler: the caller's entire visible record tree in one
//! response, assembled from the same scoped lists as the per-resource
//! endpoints.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use service_core::error::AppError;

use crate::middleware::AuthPrincipal;
use crate::models::{
    AllergyAlert, Appointment, Client, ClinicalNote, CommunicationNote, Document, Medication,
    Patient, Receipt, TreatmentPlan, Visit, VitalSigns,
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub clients: Vec<Client>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub receipts: Vec<Receipt>,
    pub visits: Vec<Visit>,
    pub vital_signs: Vec<VitalSigns>,
    pub allergy_alerts: Vec<AllergyAlert>,
    pub clinical_notes: Vec<ClinicalNote>,
    pub medications: Vec<Medication>,
    pub treatment_plans: Vec<TreatmentPlan>,
    pub documents: Vec<Document>,
    pub communication_notes: Vec<CommunicationNote>,
}

/// GET /api/overview
pub async fn overview(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;

    Ok(Json(OverviewResponse {
        clients: state.db.list_clients(&scope).await?,
        patients: state.db.list_patients(&scope).await?,
        appointments: state.db.list_appointments(&scope).await?,
        receipts: state.db.list_receipts(&scope).await?,
        visits: state.db.list_visits(&scope).await?,
        vital_signs: state.db.list_vital_signs(&scope).await?,
        allergy_alerts: state.db.list_allergy_alerts(&scope).await?,
        clinical_notes: state.db.list_clinical_notes(&scope).await?,
        medications: state.db.list_medications(&scope).await?,
        treatment_plans: state.db.list_treatment_plans(&scope).await?,
        documents: state.db.list_documents(&scope).await?,
        communication_notes: state.db.list_communication_notes(&scope).await?,
    }))
}
