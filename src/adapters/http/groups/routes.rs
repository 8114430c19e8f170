//! Axum router for group endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_group, delete_group, get_group, join_group, leave_group, list_groups, list_user_groups,
    update_group,
};

/// Routes mounted at `/api/groups`.
pub fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_group).get(list_groups))
        .route("/user/:user_id", get(list_user_groups))
        .route("/:group_id", get(get_group).put(update_group).delete(delete_group))
        .route("/:group_id/join", post(join_group))
        .route("/:group_id/leave", post(leave_group))
}
