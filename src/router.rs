use axum::http::{HeaderName, HeaderValue, header};
use axum::{Router, middleware};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use ratingsapp_core::errors::AppError;

use crate::logging::logging_middleware;
use crate::middleware::content_type::require_json;
use crate::modules::auth::router::init_auth_router;
use crate::modules::ratings::router::init_ratings_router;
use crate::modules::roles::router::init_roles_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    // the token endpoint is form encoded, everything else speaks JSON
    let resources = Router::new()
        .merge(init_users_router())
        .merge(init_roles_router())
        .merge(init_ratings_router())
        .route_layer(middleware::from_fn(require_json));

    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .nest("/oauth", init_auth_router())
                .merge(resources),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("deny"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-xss-protection"),
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
}

async fn not_found() -> AppError {
    AppError::not_found()
}
