//! Budget BackPack - travel planning backend.
//!
//! Users plan trips, search flights, stays and places through proxied
//! third-party APIs, save results to trips, post to a social feed, join
//! travel groups and subscribe to a premium tier billed through Stripe.
//!
//! Layout follows ports and adapters: `domain` holds the entities and
//! their rules, `ports` the traits the application depends on,
//! `application` one handler per use case, and `adapters` the
//! implementations (PostgreSQL, Stripe, RapidAPI, Redis, axum).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
