//! Request body and path extractors that reject with [`AppError`] codes instead
//! of axum's plain-text rejections.

use axum::{
    Form, Json,
    extract::{
        FromRequest, FromRequestParts, Path, Request,
        rejection::{FormRejection, JsonRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use ratingsapp_core::errors::{AppError, ErrorCode};

/// JSON body. A missing or wrong content type is `content_type_not_accepted`,
/// anything that fails to parse is `invalid_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "rejected JSON body");
                match rejection {
                    JsonRejection::MissingJsonContentType(_) => {
                        AppError::from(ErrorCode::ContentTypeNotAccepted)
                    }
                    _ => AppError::from(ErrorCode::InvalidJson),
                }
            })?;

        Ok(JsonBody(value))
    }
}

/// URL-encoded form body.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(reason = %rejection.body_text(), "rejected form body");
                match rejection {
                    FormRejection::InvalidFormContentType(_) => {
                        AppError::from(ErrorCode::ContentTypeNotAccepted)
                    }
                    _ => AppError::from(ErrorCode::InvalidForm),
                }
            })?;

        Ok(FormBody(value))
    }
}

/// Numeric `{id}` path segment. Anything else cannot name a record, so it is
/// `not_found`.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found())?;

        Ok(PathId(id))
    }
}
