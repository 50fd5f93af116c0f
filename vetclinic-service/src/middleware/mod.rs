pub mod auth;
pub mod metrics;

pub use auth::{auth_middleware, AuthPrincipal};
pub use metrics::metrics_middleware;
