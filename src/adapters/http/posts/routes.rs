//! Axum router for feed endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{create_post, delete_post, get_post, list_posts, list_user_posts, update_post};

/// Routes mounted at `/api/posts`.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_post).get(list_posts))
        .route("/user/:user_id", get(list_user_posts))
        .route("/:post_id", get(get_post).put(update_post).delete(delete_post))
}
