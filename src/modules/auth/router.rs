use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::issue_token;

pub fn init_auth_router() -> Router<AppState> {
    Router::new().route("/token/", post(issue_token))
}
