use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// JSON body extractor whose rejections (bad syntax, missing or mistyped
/// fields, wrong content type) all surface as 422 `AppError`s.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                let reason = rejection.body_text();
                tracing::debug!(status = %rejection.status(), reason = %reason, "Rejected request body");
                Err(AppError::UnprocessableEntity(anyhow::anyhow!(reason)))
            }
        }
    }
}
