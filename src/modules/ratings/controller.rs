use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use ratingsapp_core::errors::AppError;
use ratingsapp_models::{Rating, RatingsQuery};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::extractors::{JsonBody, PathId};

/// List the ratings left on `?target=N`
#[instrument(skip(state, _auth))]
pub async fn list_ratings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<RatingsQuery>,
) -> Result<Json<Vec<Rating>>, AppError> {
    let target = query.target()?;
    Ok(Json(state.ratings.list_by_target(target).await?))
}

#[instrument(skip(state, _auth))]
pub async fn get_rating(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(id): PathId,
) -> Result<Json<Rating>, AppError> {
    Ok(Json(state.ratings.get(id).await?))
}

#[instrument(skip(state, auth, rating), fields(caller = auth.id()))]
pub async fn create_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(rating): JsonBody<Rating>,
) -> Result<(StatusCode, Json<Rating>), AppError> {
    let rating = state.ratings.create(Some(auth.id()), rating).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

#[instrument(skip(state, auth, rating), fields(caller = auth.id()))]
pub async fn update_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(rating): JsonBody<Rating>,
) -> Result<Json<Rating>, AppError> {
    Ok(Json(state.ratings.update(Some(auth.id()), id, rating).await?))
}

#[instrument(skip(state, auth), fields(caller = auth.id()))]
pub async fn delete_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> Result<StatusCode, AppError> {
    state.ratings.delete(Some(auth.id()), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
