use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use ratingsapp_core::errors::AppError;
use ratingsapp_models::{IdsQuery, Role};

use crate::middleware::auth::{RequireReadUsers, RequireWriteUsers};
use crate::state::AppState;
use crate::extractors::{JsonBody, PathId};

#[instrument(skip(state, _auth))]
pub async fn list_roles(
    State(state): State<AppState>,
    _auth: RequireReadUsers,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<Role>>, AppError> {
    let ids = query.ids()?;
    Ok(Json(state.roles.list(ids.as_deref()).await?))
}

#[instrument(skip(state, _auth))]
pub async fn get_role(
    State(state): State<AppState>,
    _auth: RequireReadUsers,
    PathId(id): PathId,
) -> Result<Json<Role>, AppError> {
    Ok(Json(state.roles.get(id).await?))
}

#[instrument(skip(state, _auth))]
pub async fn create_role(
    State(state): State<AppState>,
    _auth: RequireWriteUsers,
    JsonBody(role): JsonBody<Role>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    let role = state.roles.create(role).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[instrument(skip(state, _auth))]
pub async fn update_role(
    State(state): State<AppState>,
    _auth: RequireWriteUsers,
    PathId(id): PathId,
    JsonBody(role): JsonBody<Role>,
) -> Result<Json<Role>, AppError> {
    Ok(Json(state.roles.update(id, role).await?))
}

#[instrument(skip(state, _auth))]
pub async fn delete_role(
    State(state): State<AppState>,
    _auth: RequireWriteUsers,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    state.roles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
