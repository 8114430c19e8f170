//! HTTP adapter for the social feed.
//!
//! - `POST /api/posts` (auth), `GET /api/posts` (public, paginated)
//! - `GET /api/posts/user/:userId` (public, paginated)
//! - `GET /api/posts/:postId` (public)
//! - `PUT|DELETE /api/posts/:postId` (auth, author only)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::post_routes;
