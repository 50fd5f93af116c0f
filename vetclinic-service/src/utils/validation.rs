use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON extractor that runs validator rules before the handler sees the
/// payload. Parse failures surface as 400; rule failures ride the
/// standard error envelope as 422.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e)))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct NameForm {
        #[validate(length(min = 3))]
        name: String,
    }

    #[tokio::test]
    async fn rule_failures_map_to_unprocessable_entity() {
        let req = Request::builder()
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"name":"ab"}"#))
            .unwrap();
        let err = ValidatedJson::<NameForm>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn parse_failures_map_to_bad_request() {
        let req = Request::builder()
            .header("content-type", "application/json")
            .body(axum::body::Body::from("not json"))
            .unwrap();
        let err = ValidatedJson::<NameForm>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
