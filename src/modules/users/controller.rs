use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use ratingsapp_core::errors::AppError;
use ratingsapp_models::{IdsQuery, User};

use crate::middleware::auth::{RequireReadUsers, RequireWriteUsers};
use crate::state::AppState;
use crate::extractors::{JsonBody, PathId};

/// List principals, optionally restricted to `?id=1,2,3`
#[instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: RequireReadUsers,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let ids = query.ids()?;
    let users = state.users.list(ids.as_deref()).await?;
    Ok(Json(users))
}

#[instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth: RequireReadUsers,
    PathId(id): PathId,
) -> Result<Json<User>, AppError> {
    let user = state.users.get(id).await?;
    Ok(Json(user))
}

#[instrument(skip(state, _auth, user))]
pub async fn create_user(
    State(state): State<AppState>,
    _auth: RequireWriteUsers,
    JsonBody(user): JsonBody<User>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.users.create(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, _auth, user))]
pub async fn update_user(
    State(state): State<AppState>,
    _auth: RequireWriteUsers,
    PathId(id): PathId,
    JsonBody(user): JsonBody<User>,
) -> Result<Json<User>, AppError> {
    let user = state.users.update(id, user).await?;
    Ok(Json(user))
}

#[instrument(skip(state, _auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    _auth: RequireWriteUsers,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
