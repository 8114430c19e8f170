//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `UserRepository`, `ReferralRepository`, `TripRepository`,
//!   `PostRepository`, `GroupRepository`, `SubscriptionRepository`
//! - `WebhookEventRepository` - idempotency log for payment webhooks
//!
//! ## Outbound services
//!
//! - `PaymentProvider` - payment processor API
//! - `FlightSearch`, `AccommodationSearch`, `PlaceSearch` - search providers
//!
//! ## Edge
//!
//! - `TokenService`, `PasswordHasher` - authentication primitives
//! - `RateLimiter` - per-IP request budgets

mod group_repository;
mod password_hasher;
mod payment_provider;
mod post_repository;
mod rate_limiter;
mod referral_repository;
mod search;
mod subscription_repository;
mod token_service;
mod trip_repository;
mod user_repository;
mod webhook_event_repository;

pub use group_repository::GroupRepository;
pub use password_hasher::PasswordHasher;
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentErrorCode, PaymentProvider, PortalSession,
};
pub use post_repository::PostRepository;
pub use rate_limiter::{
    RateLimitClass, RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult,
    RateLimitStatus, RateLimiter,
};
pub use referral_repository::ReferralRepository;
pub use search::{AccommodationSearch, FlightSearch, PlaceSearch, SearchError, SearchKind};
pub use subscription_repository::SubscriptionRepository;
pub use token_service::{IssuedToken, TokenService};
pub use trip_repository::TripRepository;
pub use user_repository::UserRepository;
pub use webhook_event_repository::{
    SaveResult, WebhookEventRecord, WebhookEventRepository, WebhookOutcome, WebhookResult,
};
