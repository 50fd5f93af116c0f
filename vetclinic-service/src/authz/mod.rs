//! Ownership-scoped authorization core.
//!
//! Three pieces cooperate on every request: the access policy gates the
//! method by role and resource family, the ownership resolver maps the
//! principal to its scope, and the query scoper turns that scope into the
//! storage predicate every read and write goes through. Dashboards compose
//! the same primitives, so policy and reporting can never drift apart.

pub mod policy;
pub mod scope;

pub use policy::{AccessPolicy, ResourceFamily, ResourceKind};
pub use scope::{OwnerPath, OwnershipScope, ScopeFilter};
