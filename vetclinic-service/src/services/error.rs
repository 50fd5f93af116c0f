use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    WrongPortal(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::DuplicateUsername => {
                AppError::Conflict(anyhow::anyhow!("Username already exists"))
            }
            ServiceError::DuplicateEmail => {
                AppError::Conflict(anyhow::anyhow!("Email already exists"))
            }
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::WrongPortal(msg) => AppError::Forbidden(anyhow::anyhow!(msg)),
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn wrong_portal_maps_to_forbidden() {
        assert_eq!(
            status_of(ServiceError::WrongPortal("This login is for clients only")),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn bad_credentials_map_to_unauthorized() {
        assert_eq!(
            status_of(ServiceError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn duplicates_map_to_conflict() {
        assert_eq!(status_of(ServiceError::DuplicateUsername), StatusCode::CONFLICT);
        assert_eq!(status_of(ServiceError::DuplicateEmail), StatusCode::CONFLICT);
    }
}
