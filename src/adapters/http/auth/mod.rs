//! HTTP adapter for identity endpoints.
//!
//! - `POST /api/auth/register` - create an account, returns a token
//! - `POST /api/auth/login` - exchange credentials for a token
//! - `GET /api/auth/me` - the caller's own profile
//! - `PUT /api/auth/profile` - edit bio, picture and preferences
//! - `GET /api/auth/users/:userId/profile` - public profile card
//!
//! Register and login sit behind the stricter auth rate limit.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::auth_routes;
