//! Domain models for vetclinic-service.

mod appointment;
mod client;
mod clinical;
mod communication;
mod patient;
mod principal;
mod receipt;
mod visit;

pub use appointment::{Appointment, CreateAppointment, UpdateAppointment};
pub use client::{Client, UpdateClient};
pub use clinical::{
    AllergyAlert, ClinicalNote, CreateAllergyAlert, CreateClinicalNote, CreateDocument,
    CreateMedication, CreateTreatmentPlan, CreateVitalSigns, Document, Medication, TreatmentPlan,
    UpdateAllergyAlert, UpdateClinicalNote, UpdateDocument, UpdateMedication, UpdateTreatmentPlan,
    UpdateVitalSigns, VitalSigns,
};
pub use communication::{CommunicationNote, CreateCommunicationNote, UpdateCommunicationNote};
pub use patient::{CreatePatient, Patient, UpdatePatient};
pub use principal::{Principal, Role};
pub use receipt::{CreateReceipt, Receipt, ReceiptStatus, UpdateReceipt};
pub use visit::{CreateVisit, UpdateVisit, Visit, VisitStatus};
