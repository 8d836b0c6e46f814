use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, instrument};

use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_models::{GrantType, TokenPair, TokenRequest};

use crate::state::AppState;
use crate::extractors::FormBody;

/// Token endpoint failures, shaped after RFC 6749 section 5.2.
#[derive(Debug)]
pub enum OAuthError {
    InvalidRequest(&'static str),
    UnsupportedGrantType,
    InvalidClient,
    Server(anyhow::Error),
}

impl From<AppError> for OAuthError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Public(ErrorCode::Unauthorized) => OAuthError::InvalidClient,
            AppError::Internal(err) => OAuthError::Server(err),
            other => OAuthError::InvalidRequest(other.code()),
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        match self {
            OAuthError::InvalidRequest(description) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_request", "error_description": description })),
            )
                .into_response(),
            OAuthError::UnsupportedGrantType => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "unsupported_grant_type" })),
            )
                .into_response(),
            OAuthError::InvalidClient => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid_client" })),
            )
                .into_response(),
            OAuthError::Server(err) => {
                error!(error = ?err, "token endpoint failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "server_error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Issue a token pair from a password or refresh token grant
#[instrument(skip_all)]
pub async fn issue_token(
    State(state): State<AppState>,
    form: Result<FormBody<TokenRequest>, AppError>,
) -> Result<Json<TokenPair>, OAuthError> {
    let FormBody(request) = form?;

    let user = match request.grant() {
        Some(GrantType::Password) => {
            state
                .auth
                .authenticate(&request.email, &request.password)
                .await?
        }
        Some(GrantType::RefreshToken) => state.auth.refresh(&request.refresh_token).await?,
        None => return Err(OAuthError::UnsupportedGrantType),
    };

    let pair = state.auth.issue_tokens(&user)?;
    Ok(Json(pair))
}
