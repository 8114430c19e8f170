//! HTTP adapter for travel groups.
//!
//! - `POST /api/groups` (auth), `GET /api/groups` (public, paginated)
//! - `GET /api/groups/user/:userId` - groups created by a user
//! - `GET /api/groups/:groupId` (public)
//! - `PUT|DELETE /api/groups/:groupId` (auth, creator only)
//! - `POST /api/groups/:groupId/join`, `POST /api/groups/:groupId/leave` (auth)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::group_routes;
