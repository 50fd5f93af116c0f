//! Clinical record handlers: visits and the records hanging off them,
//! plus patient-level allergy alerts and documents.
//!
//! Writes are doctor-only by policy. Reads go to both roles and are
//! narrowed by query scoping, so a client sees only its own animals'
//! records.

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
use crate::models::{
    CreateAllergyAlert, CreateClinicalNote, CreateDocument, CreateMedication, CreateTreatmentPlan,
    CreateVisit, CreateVitalSigns, UpdateAllergyAlert, UpdateClinicalNote, UpdateDocument,
    UpdateMedication, UpdateTreatmentPlan, UpdateVisit, UpdateVitalSigns,
};
use crate::AppState;

fn not_found(kind: ResourceKind) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} not found", kind.as_str()))
}

// =============================================================================
// Visits
// =============================================================================

/// GET /api/visits
pub async fn list_visits(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Visit, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_visits(&scope).await?))
}

/// POST /api/visits
pub async fn create_visit(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateVisit>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Visit, Method::POST)?;
    let visit = state.db.create_visit(&input).await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// GET /api/visits/:id
pub async fn get_visit(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Visit, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let visit = state
        .db
        .get_visit(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Visit))?;
    Ok(Json(visit))
}

/// PUT /api/visits/:id
pub async fn update_visit(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateVisit>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Visit, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let visit = state
        .db
        .update_visit(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Visit))?;
    Ok(Json(visit))
}

/// DELETE /api/visits/:id
pub async fn delete_visit(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Visit, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_visit(&scope, id).await? {
        return Err(not_found(ResourceKind::Visit));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Vital Signs
// =============================================================================

/// GET /api/vitals
pub async fn list_vital_signs(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::VitalSigns, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_vital_signs(&scope).await?))
}

/// POST /api/vitals
pub async fn create_vital_signs(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateVitalSigns>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::VitalSigns, Method::POST)?;
    let vitals = state.db.create_vital_signs(&input).await?;
    Ok((StatusCode::CREATED, Json(vitals)))
}

/// GET /api/vitals/:id
pub async fn get_vital_signs(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::VitalSigns, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let vitals = state
        .db
        .get_vital_signs(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::VitalSigns))?;
    Ok(Json(vitals))
}

/// PUT /api/vitals/:id
pub async fn update_vital_signs(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateVitalSigns>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::VitalSigns, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let vitals = state
        .db
        .update_vital_signs(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::VitalSigns))?;
    Ok(Json(vitals))
}

/// DELETE /api/vitals/:id
pub async fn delete_vital_signs(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::VitalSigns, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_vital_signs(&scope, id).await? {
        return Err(not_found(ResourceKind::VitalSigns));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Allergy Alerts
// =============================================================================

/// GET /api/allergies
pub async fn list_allergy_alerts(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::AllergyAlert, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_allergy_alerts(&scope).await?))
}

/// POST /api/allergies
pub async fn create_allergy_alert(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateAllergyAlert>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::AllergyAlert, Method::POST)?;
    let alert = state.db.create_allergy_alert(&input).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// GET /api/allergies/:id
pub async fn get_allergy_alert(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::AllergyAlert, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let alert = state
        .db
        .get_allergy_alert(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::AllergyAlert))?;
    Ok(Json(alert))
}

/// PUT /api/allergies/:id
pub async fn update_allergy_alert(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateAllergyAlert>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::AllergyAlert, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let alert = state
        .db
        .update_allergy_alert(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::AllergyAlert))?;
    Ok(Json(alert))
}

/// DELETE /api/allergies/:id
pub async fn delete_allergy_alert(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::AllergyAlert, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_allergy_alert(&scope, id).await? {
        return Err(not_found(ResourceKind::AllergyAlert));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Clinical Notes
// =============================================================================

/// GET /api/medical-notes
pub async fn list_clinical_notes(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::ClinicalNote, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_clinical_notes(&scope).await?))
}

/// POST /api/medical-notes
pub async fn create_clinical_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateClinicalNote>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::ClinicalNote, Method::POST)?;
    let note = state.db.create_clinical_note(&input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/medical-notes/:id
pub async fn get_clinical_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::ClinicalNote, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let note = state
        .db
        .get_clinical_note(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::ClinicalNote))?;
    Ok(Json(note))
}

/// PUT /api/medical-notes/:id
pub async fn update_clinical_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateClinicalNote>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::ClinicalNote, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let note = state
        .db
        .update_clinical_note(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::ClinicalNote))?;
    Ok(Json(note))
}

/// DELETE /api/medical-notes/:id
pub async fn delete_clinical_note(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::ClinicalNote, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_clinical_note(&scope, id).await? {
        return Err(not_found(ResourceKind::ClinicalNote));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Medications
// =============================================================================

/// GET /api/medications
pub async fn list_medications(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Medication, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_medications(&scope).await?))
}

/// POST /api/medications
pub async fn create_medication(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateMedication>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Medication, Method::POST)?;
    let medication = state.db.create_medication(&input).await?;
    Ok((StatusCode::CREATED, Json(medication)))
}

/// GET /api/medications/:id
pub async fn get_medication(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Medication, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let medication = state
        .db
        .get_medication(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Medication))?;
    Ok(Json(medication))
}

/// PUT /api/medications/:id
pub async fn update_medication(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMedication>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Medication, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let medication = state
        .db
        .update_medication(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Medication))?;
    Ok(Json(medication))
}

/// DELETE /api/medications/:id
pub async fn delete_medication(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Medication, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_medication(&scope, id).await? {
        return Err(not_found(ResourceKind::Medication));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Treatment Plans
// =============================================================================

/// GET /api/treatments
pub async fn list_treatment_plans(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::TreatmentPlan, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_treatment_plans(&scope).await?))
}

/// POST /api/treatments
pub async fn create_treatment_plan(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateTreatmentPlan>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::TreatmentPlan, Method::POST)?;
    let plan = state.db.create_treatment_plan(&input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /api/treatments/:id
pub async fn get_treatment_plan(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::TreatmentPlan, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let plan = state
        .db
        .get_treatment_plan(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::TreatmentPlan))?;
    Ok(Json(plan))
}

/// PUT /api/treatments/:id
pub async fn update_treatment_plan(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTreatmentPlan>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::TreatmentPlan, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let plan = state
        .db
        .update_treatment_plan(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::TreatmentPlan))?;
    Ok(Json(plan))
}

/// DELETE /api/treatments/:id
pub async fn delete_treatment_plan(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::TreatmentPlan, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_treatment_plan(&scope, id).await? {
        return Err(not_found(ResourceKind::TreatmentPlan));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Documents
// =============================================================================

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
    principal: AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Document, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    Ok(Json(state.db.list_documents(&scope).await?))
}

/// POST /api/documents
pub async fn create_document(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Json(input): Json<CreateDocument>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Document, Method::POST)?;
    let document = state.db.create_document(&input).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Document, Method::GET)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let document = state
        .db
        .get_document(&scope, id)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Document))?;
    Ok(Json(document))
}

/// PUT /api/documents/:id
pub async fn update_document(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateDocument>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Document, Method::PUT)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    let document = state
        .db
        .update_document(&scope, id, &input)
        .await?
        .ok_or_else(|| not_found(ResourceKind::Document))?;
    Ok(Json(document))
}

/// DELETE /api/documents/:id
pub async fn delete_document(
    State(state): State<AppState>,
    principal: AuthPrincipal,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(principal, ResourceKind::Document, Method::DELETE)?;
    let scope = state.db.resolve_scope(principal.id, principal.role).await?;
    if !state.db.delete_document(&scope, id).await? {
        return Err(not_found(ResourceKind::Document));
    }
    Ok(StatusCode::NO_CONTENT)
}
