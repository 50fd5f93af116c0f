//! Ownership scope resolution and query scoping.

use super::policy::ResourceKind;
use uuid::Uuid;

/// The set of client-owned rows a principal may see.
///
/// Doctors get `Global`. A client-role principal gets `Owned` with its
/// client id, or `None` when the linked client row is missing. `None` is
/// not an error: it scopes every query down to the empty set, so a broken
/// ownership link reads as "nothing exists" instead of escalating or
/// surfacing a per-row denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipScope {
    Global,
    Owned(Uuid),
    None,
}

impl OwnershipScope {
    pub fn client_id(&self) -> Option<Uuid> {
        match self {
            OwnershipScope::Owned(id) => Some(*id),
            _ => None,
        }
    }
}

/// Join path from a resource table back to its owning client. One
/// declarative table shared by every scoped query and by the dashboard
/// aggregations, so the two can never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerPath {
    /// The row *is* the client record (`id = client`).
    SelfRecord,
    /// Direct foreign key (`client_id = client`).
    Direct,
    /// One hop through the patient table.
    ViaPatient,
    /// Two hops: visit, then patient.
    ViaVisit,
}

impl ResourceKind {
    pub fn owner_path(self) -> OwnerPath {
        match self {
            ResourceKind::Client => OwnerPath::SelfRecord,
            ResourceKind::Patient
            | ResourceKind::Appointment
            | ResourceKind::Receipt
            | ResourceKind::CommunicationNote => OwnerPath::Direct,
            ResourceKind::Visit | ResourceKind::AllergyAlert | ResourceKind::Document => {
                OwnerPath::ViaPatient
            }
            ResourceKind::VitalSigns
            | ResourceKind::ClinicalNote
            | ResourceKind::Medication
            | ResourceKind::TreatmentPlan => OwnerPath::ViaVisit,
        }
    }
}

/// A SQL predicate restricting a resource table to one ownership scope.
///
/// The clause references `$1` when it carries a bind; callers appending
/// further parameters must start from [`ScopeFilter::next_placeholder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    pub clause: &'static str,
    pub client_id: Option<Uuid>,
}

impl ScopeFilter {
    /// Build the predicate for one resource kind under one scope.
    pub fn for_kind(kind: ResourceKind, scope: &OwnershipScope) -> Self {
        match scope {
            OwnershipScope::Global => ScopeFilter {
                clause: "TRUE",
                client_id: None,
            },
            OwnershipScope::None => ScopeFilter {
                clause: "FALSE",
                client_id: None,
            },
            OwnershipScope::Owned(id) => {
                let clause = match kind.owner_path() {
                    OwnerPath::SelfRecord => "id = $1",
                    OwnerPath::Direct => "client_id = $1",
                    OwnerPath::ViaPatient => {
                        "patient_id IN (SELECT id FROM patients WHERE client_id = $1)"
                    }
                    OwnerPath::ViaVisit => {
                        "visit_id IN (SELECT v.id FROM visits v \
                         JOIN patients p ON p.id = v.patient_id WHERE p.client_id = $1)"
                    }
                };
                ScopeFilter {
                    clause,
                    client_id: Some(*id),
                }
            }
        }
    }

    /// Placeholder for the first parameter a caller appends after the
    /// scope bind.
    pub fn next_placeholder(&self) -> &'static str {
        if self.client_id.is_some() { "$2" } else { "$1" }
    }

    /// Resolve the owning client for a create. Server-assigned ownership
    /// always wins: a client-role creator gets its own client id no matter
    /// what the payload names; only the global scope may choose an owner.
    pub fn owner_for_create(scope: &OwnershipScope, payload_owner: Option<Uuid>) -> Option<Uuid> {
        match scope {
            OwnershipScope::Owned(id) => Some(*id),
            OwnershipScope::Global => payload_owner,
            OwnershipScope::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn global_scope_is_identity() {
        for kind in ResourceKind::ALL {
            let f = ScopeFilter::for_kind(kind, &OwnershipScope::Global);
            assert_eq!(f.clause, "TRUE");
            assert_eq!(f.client_id, None);
            assert_eq!(f.next_placeholder(), "$1");
        }
    }

    #[test]
    fn missing_scope_matches_nothing() {
        for kind in ResourceKind::ALL {
            let f = ScopeFilter::for_kind(kind, &OwnershipScope::None);
            assert_eq!(f.clause, "FALSE");
            assert_eq!(f.client_id, None);
        }
    }

    #[test]
    fn owned_scope_uses_the_declared_join_path() {
        let id = client();
        let scope = OwnershipScope::Owned(id);

        let patient = ScopeFilter::for_kind(ResourceKind::Patient, &scope);
        assert_eq!(patient.clause, "client_id = $1");
        assert_eq!(patient.client_id, Some(id));
        assert_eq!(patient.next_placeholder(), "$2");

        let visit = ScopeFilter::for_kind(ResourceKind::Visit, &scope);
        assert!(visit.clause.starts_with("patient_id IN"));

        let vitals = ScopeFilter::for_kind(ResourceKind::VitalSigns, &scope);
        assert!(vitals.clause.starts_with("visit_id IN"));

        let own_record = ScopeFilter::for_kind(ResourceKind::Client, &scope);
        assert_eq!(own_record.clause, "id = $1");
    }

    #[test]
    fn every_kind_has_an_owner_path() {
        for kind in ResourceKind::ALL {
            // Exhaustiveness is enforced by the match; this pins the
            // direct-ownership set.
            let direct = matches!(
                kind,
                ResourceKind::Patient
                    | ResourceKind::Appointment
                    | ResourceKind::Receipt
                    | ResourceKind::CommunicationNote
            );
            assert_eq!(kind.owner_path() == OwnerPath::Direct, direct);
        }
    }

    #[test]
    fn create_owner_is_server_assigned_for_clients() {
        let own = client();
        let other = client();
        assert_eq!(
            ScopeFilter::owner_for_create(&OwnershipScope::Owned(own), Some(other)),
            Some(own)
        );
        assert_eq!(
            ScopeFilter::owner_for_create(&OwnershipScope::Global, Some(other)),
            Some(other)
        );
        assert_eq!(
            ScopeFilter::owner_for_create(&OwnershipScope::None, Some(other)),
            None
        );
    }
}
