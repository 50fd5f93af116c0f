//! Role/method access policy.

use crate::models::Role;
use axum::http::Method;

/// Every resource type the service exposes. Closed set: a request for
/// anything not representable here never reaches the policy and is denied
/// by the router's fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Client,
    Patient,
    Appointment,
    Receipt,
    Visit,
    VitalSigns,
    AllergyAlert,
    Document,
    ClinicalNote,
    Medication,
    TreatmentPlan,
    CommunicationNote,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 12] = [
        ResourceKind::Client,
        ResourceKind::Patient,
        ResourceKind::Appointment,
        ResourceKind::Receipt,
        ResourceKind::Visit,
        ResourceKind::VitalSigns,
        ResourceKind::AllergyAlert,
        ResourceKind::Document,
        ResourceKind::ClinicalNote,
        ResourceKind::Medication,
        ResourceKind::TreatmentPlan,
        ResourceKind::CommunicationNote,
    ];

    /// Resource family grouping for the write policy. Patient sits in both
    /// tables (reads as clinical, writes open to either role), so it is
    /// handled explicitly in [`AccessPolicy::allows`] rather than here.
    pub fn family(self) -> ResourceFamily {
        match self {
            ResourceKind::Client | ResourceKind::Appointment | ResourceKind::Receipt => {
                ResourceFamily::Scheduling
            }
            ResourceKind::Patient
            | ResourceKind::Visit
            | ResourceKind::VitalSigns
            | ResourceKind::AllergyAlert
            | ResourceKind::Document
            | ResourceKind::ClinicalNote
            | ResourceKind::Medication
            | ResourceKind::TreatmentPlan
            | ResourceKind::CommunicationNote => ResourceFamily::Clinical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Client => "client",
            ResourceKind::Patient => "patient",
            ResourceKind::Appointment => "appointment",
            ResourceKind::Receipt => "receipt",
            ResourceKind::Visit => "visit",
            ResourceKind::VitalSigns => "vital_signs",
            ResourceKind::AllergyAlert => "allergy_alert",
            ResourceKind::Document => "document",
            ResourceKind::ClinicalNote => "clinical_note",
            ResourceKind::Medication => "medication",
            ResourceKind::TreatmentPlan => "treatment_plan",
            ResourceKind::CommunicationNote => "communication_note",
        }
    }
}

/// Two fixed resource families with asymmetric read/write policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFamily {
    /// Doctor full CRUD, client read-only.
    Clinical,
    /// Client full CRUD, doctor read-only.
    Scheduling,
}

/// The fixed two-table policy. Pure function of (role, resource, method);
/// nothing here touches storage.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Decide whether `role` may perform `method` on `kind`.
    ///
    /// Reads are open to every authenticated role; visibility is enforced
    /// by query scoping, not by this gate. Writes split by family: clinical
    /// records belong to doctors, scheduling/billing records to clients.
    /// Patient is the one dual-family resource: doctors manage the medical
    /// record, owners manage their own animals, so both roles may write.
    /// A missing role is denied on everything.
    pub fn allows(role: Option<Role>, kind: ResourceKind, method: &Method) -> bool {
        let Some(role) = role else {
            return false;
        };

        if Self::is_read(method) {
            return true;
        }

        match kind {
            ResourceKind::Patient => true,
            _ => match kind.family() {
                ResourceFamily::Clinical => role == Role::Doctor,
                ResourceFamily::Scheduling => role == Role::Client,
            },
        }
    }

    fn is_read(method: &Method) -> bool {
        matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRITES: [Method; 4] = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    #[test]
    fn unauthenticated_is_denied_everywhere() {
        for kind in ResourceKind::ALL {
            assert!(!AccessPolicy::allows(None, kind, &Method::GET));
            assert!(!AccessPolicy::allows(None, kind, &Method::POST));
        }
    }

    #[test]
    fn reads_are_open_to_both_roles() {
        for kind in ResourceKind::ALL {
            for role in [Role::Doctor, Role::Client] {
                assert!(AccessPolicy::allows(Some(role), kind, &Method::GET));
            }
        }
    }

    #[test]
    fn clinical_writes_are_doctor_only() {
        let clinical = [
            ResourceKind::Visit,
            ResourceKind::VitalSigns,
            ResourceKind::AllergyAlert,
            ResourceKind::Document,
            ResourceKind::ClinicalNote,
            ResourceKind::Medication,
            ResourceKind::TreatmentPlan,
            ResourceKind::CommunicationNote,
        ];
        for kind in clinical {
            for method in &WRITES {
                assert!(AccessPolicy::allows(Some(Role::Doctor), kind, method));
                assert!(!AccessPolicy::allows(Some(Role::Client), kind, method));
            }
        }
    }

    #[test]
    fn scheduling_writes_are_client_only() {
        let scheduling = [
            ResourceKind::Client,
            ResourceKind::Appointment,
            ResourceKind::Receipt,
        ];
        for kind in scheduling {
            for method in &WRITES {
                assert!(AccessPolicy::allows(Some(Role::Client), kind, method));
                assert!(!AccessPolicy::allows(Some(Role::Doctor), kind, method));
            }
        }
    }

    #[test]
    fn patient_is_writable_by_both_roles() {
        for method in &WRITES {
            assert!(AccessPolicy::allows(
                Some(Role::Doctor),
                ResourceKind::Patient,
                method
            ));
            assert!(AccessPolicy::allows(
                Some(Role::Client),
                ResourceKind::Patient,
                method
            ));
        }
    }
}
