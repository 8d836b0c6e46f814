use axum::{Router, routing::get};

use crate::modules::ratings::controller::{
    create_rating, delete_rating, get_rating, list_ratings, update_rating,
};
use crate::state::AppState;

pub fn init_ratings_router() -> Router<AppState> {
    Router::new()
        .route("/ratings/", get(list_ratings).post(create_rating))
        .route(
            "/ratings/{id}",
            get(get_rating).put(update_rating).delete(delete_rating),
        )
}
