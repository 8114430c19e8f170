//! HTTP adapter - the REST API.
//!
//! Each area has its own module with `dto`, `handlers` and `routes`;
//! `router` assembles them under `/api` with the shared layers.

pub mod auth;
pub mod billing;
pub mod dto;
pub mod error;
pub mod extract;
pub mod groups;
pub mod middleware;
pub mod posts;
pub mod referrals;
pub mod router;
pub mod search;
pub mod state;
pub mod trips;

pub use error::{expose_error_detail, MessageBody};
pub use router::{api_routes, build_router};
pub use state::AppState;
