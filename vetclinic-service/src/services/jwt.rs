//! Bearer token issuance and validation.
//!
//! This is the boundary adapter to the identity layer: everything past the
//! auth middleware consumes only the resolved principal id and role carried
//! in the claims, never the token itself.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::models::Role;
use crate::services::ServiceError;

/// Claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (principal id)
    pub sub: Uuid,
    /// Role at issuance time
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Token service signing with HS256.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

impl JwtService {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            access_token_expiry_minutes: settings.access_token_expiry_minutes,
        }
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    /// Issue an access token for a principal.
    pub fn issue_access_token(&self, principal_id: Uuid, role: Role) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: principal_id,
            role,
            exp: (now + Duration::minutes(self.access_token_expiry_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Token signing error: {}", e)))
    }

    /// Validate a token and return its claims. Expired or tampered tokens
    /// fail here; role strings are already strict by construction.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, ServiceError> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| ServiceError::InvalidCredentials)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(&AuthSettings {
            jwt_secret: "unit-test-secret".to_string(),
            access_token_expiry_minutes: 15,
        })
    }

    #[test]
    fn issued_token_round_trips() {
        let svc = service();
        let id = Uuid::new_v4();
        let token = svc.issue_access_token(id, Role::Client).unwrap();
        let claims = svc.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Client);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let svc = service();
        let other = JwtService::new(&AuthSettings {
            jwt_secret: "different-secret".to_string(),
            access_token_expiry_minutes: 15,
        });
        let token = other
            .issue_access_token(Uuid::new_v4(), Role::Doctor)
            .unwrap();
        assert!(svc.validate_access_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(service().validate_access_token("not.a.token").is_err());
    }
}
