//! vetclinic-service: clinical and billing records for a veterinary
//! practice, with ownership-scoped authorization.
//!
//! Two roles exist. Doctors operate clinic-wide; clients operate on their
//! own subtree only. The policy gate in [`authz`] decides who may write
//! what, and every storage query is narrowed by the caller's
//! [`authz::OwnershipScope`], so reads can never leak across owners.

pub mod authz;
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{Application, AppState};
