use axum::{Router, routing::get};

use crate::modules::roles::controller::{
    create_role, delete_role, get_role, list_roles, update_role,
};
use crate::state::AppState;

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/roles/", get(list_roles).post(create_role))
        .route("/roles/{id}", get(get_role).put(update_role).delete(delete_role))
}
