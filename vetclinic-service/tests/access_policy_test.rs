//! Policy matrix tests: who may do what, without touching storage.

use axum::http::Method;
use vetclinic_service::authz::{AccessPolicy, ResourceFamily, ResourceKind};
use vetclinic_service::models::Role;

const WRITE_METHODS: [Method; 4] = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];
const READ_METHODS: [Method; 3] = [Method::GET, Method::HEAD, Method::OPTIONS];

#[test]
fn unauthenticated_callers_are_denied_everything() {
    for kind in ResourceKind::ALL {
        for method in WRITE_METHODS.iter().chain(READ_METHODS.iter()) {
            assert!(
                !AccessPolicy::allows(None, kind, method),
                "anonymous {} on {:?} must be denied",
                method,
                kind
            );
        }
    }
}

#[test]
fn reads_are_open_to_both_roles() {
    for kind in ResourceKind::ALL {
        for method in &READ_METHODS {
            assert!(AccessPolicy::allows(Some(Role::Doctor), kind, method));
            assert!(AccessPolicy::allows(Some(Role::Client), kind, method));
        }
    }
}

#[test]
fn clinical_writes_are_doctor_only() {
    for kind in ResourceKind::ALL {
        if kind == ResourceKind::Patient || kind.family() != ResourceFamily::Clinical {
            continue;
        }
        for method in &WRITE_METHODS {
            assert!(
                AccessPolicy::allows(Some(Role::Doctor), kind, method),
                "doctor {} on {:?}",
                method,
                kind
            );
            assert!(
                !AccessPolicy::allows(Some(Role::Client), kind, method),
                "client {} on {:?} must be denied",
                method,
                kind
            );
        }
    }
}

#[test]
fn scheduling_writes_are_client_only() {
    for kind in [
        ResourceKind::Client,
        ResourceKind::Appointment,
        ResourceKind::Receipt,
    ] {
        for method in &WRITE_METHODS {
            assert!(
                AccessPolicy::allows(Some(Role::Client), kind, method),
                "client {} on {:?}",
                method,
                kind
            );
            assert!(
                !AccessPolicy::allows(Some(Role::Doctor), kind, method),
                "doctor {} on {:?} must be denied",
                method,
                kind
            );
        }
    }
}

#[test]
fn patient_writes_are_open_to_both_roles() {
    for method in &WRITE_METHODS {
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
