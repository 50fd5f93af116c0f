//! Scope filter tests: the SQL predicates every storage query is
//! narrowed by.

use uuid::Uuid;
use vetclinic_service::authz::{OwnershipScope, ResourceKind, ScopeFilter};

#[test]
fn global_scope_sees_everything() {
    for kind in ResourceKind::ALL {
        let filter = ScopeFilter::for_kind(kind, &OwnershipScope::Global);
        assert_eq!(filter.clause, "TRUE");
        assert!(filter.client_id.is_none());
    }
}

#[test]
fn broken_ownership_link_reads_as_empty_world() {
    for kind in ResourceKind::ALL {
        let filter = ScopeFilter::for_kind(kind, &OwnershipScope::None);
        assert_eq!(filter.clause, "FALSE");
        assert!(filter.client_id.is_none());
    }
}

#[test]
fn owned_scope_always_carries_the_client_bind() {
    let id = Uuid::new_v4();
    for kind in ResourceKind::ALL {
        let filter = ScopeFilter::for_kind(kind, &OwnershipScope::Owned(id));
        assert_eq!(filter.client_id, Some(id), "{:?} must bind the client", kind);
        assert!(
            filter.clause.contains("$1"),
            "{:?} clause must reference the bind",
            kind
        );
        assert_eq!(filter.next_placeholder(), "$2");
    }
}

#[test]
fn client_table_scopes_to_own_row() {
    let id = Uuid::new_v4();
    let filter = ScopeFilter::for_kind(ResourceKind::Client, &OwnershipScope::Owned(id));
    assert_eq!(filter.clause, "id = $1");
}

#[test]
fn direct_children_scope_by_foreign_key() {
    let id = Uuid::new_v4();
    for kind in [
        ResourceKind::Patient,
        ResourceKind::Appointment,
        ResourceKind::Receipt,
        ResourceKind::CommunicationNote,
    ] {
        let filter = ScopeFilter::for_kind(kind, &OwnershipScope::Owned(id));
        assert_eq!(filter.clause, "client_id = $1");
    }
}

#[test]
fn visit_subtree_scopes_through_the_join_chain() {
    let id = Uuid::new_v4();

    for kind in [
        ResourceKind::Visit,
        ResourceKind::AllergyAlert,
        ResourceKind::Document,
    ] {
        let filter = ScopeFilter::for_kind(kind, &OwnershipScope::Owned(id));
        assert!(filter.clause.starts_with("patient_id IN"), "{:?}", kind);
    }

    for kind in [
        ResourceKind::VitalSigns,
        ResourceKind::ClinicalNote,
        ResourceKind::Medication,
        ResourceKind::TreatmentPlan,
    ] {
        let filter = ScopeFilter::for_kind(kind, &OwnershipScope::Owned(id));
        assert!(filter.clause.starts_with("visit_id IN"), "{:?}", kind);
    }
}

#[test]
fn client_creators_can_never_assign_records_to_others() {
    let own = Uuid::new_v4();
    let someone_else = Uuid::new_v4();

    assert_eq!(
        ScopeFilter::owner_for_create(&OwnershipScope::Owned(own), Some(someone_else)),
        Some(own)
    );
    assert_eq!(
        ScopeFilter::owner_for_create(&OwnershipScope::Owned(own), None),
        Some(own)
    );
}

#[test]
fn doctors_choose_the_owner_explicitly() {
    let chosen = Uuid::new_v4();
    assert_eq!(
        ScopeFilter::owner_for_create(&OwnershipScope::Global, Some(chosen)),
        Some(chosen)
    );
    assert_eq!(
        ScopeFilter::owner_for_create(&OwnershipScope::Global, None),
        None
    );
}
