//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, ownership, paging)
//! - `user` - Accounts, credentials, profiles and tiers
//! - `referral` - Referrer/referred pairs
//! - `trip` - Trips and their saved flights, stays and activities
//! - `social` - Feed posts
//! - `group` - Travel groups and membership
//! - `billing` - Subscriptions and payment webhooks
//! - `search` - Search queries and normalised offers

pub mod billing;
pub mod foundation;
pub mod group;
pub mod referral;
pub mod search;
pub mod social;
pub mod trip;
pub mod user;
