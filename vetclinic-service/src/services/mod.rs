//! Service layer for vetclinic-service.

pub mod dashboard;
pub mod database;
pub mod error;
pub mod jwt;
pub mod metrics;
pub mod password;
pub mod registration;

pub use dashboard::{DashboardSummary, MonthlyBucket};
pub use database::Database;
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, JwtService};
pub use metrics::{get_metrics, init_metrics};
pub use registration::RegistrationService;
