//! In-memory repositories.
//!
//! Every persistence port has a HashMap-backed implementation here. They
//! enforce the same unique keys and version checks as the Postgres
//! adapters so HTTP tests exercise the real conflict paths.

mod group_repository;
mod post_repository;
mod referral_repository;
mod subscription_repository;
mod trip_repository;
mod user_repository;
mod webhook_event_repository;

pub use group_repository::InMemoryGroupRepository;
pub use post_repository::InMemoryPostRepository;
pub use referral_repository::InMemoryReferralRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use trip_repository::InMemoryTripRepository;
pub use user_repository::InMemoryUserRepository;
pub use webhook_event_repository::InMemoryWebhookEventRepository;

use crate::domain::foundation::{DomainError, Timestamp};

/// A stored document plus its insertion order, used to break ties when
/// two documents share a creation timestamp.
#[derive(Debug, Clone)]
struct Stored<T> {
    doc: T,
    seq: u64,
}

/// Rejects a write whose version no longer matches the stored one.
fn check_version(entity: &str, stored: i64, incoming: i64) -> Result<(), DomainError> {
    if stored != incoming {
        return Err(DomainError::concurrent_modification(entity)
            .with_detail("expected_version", incoming.to_string())
            .with_detail("stored_version", stored.to_string()));
    }
    Ok(())
}

/// Newest first, later inserts winning ties.
fn newest_first<T: Clone>(mut rows: Vec<&Stored<T>>, created_at: impl Fn(&T) -> Timestamp) -> Vec<T> {
    rows.sort_by(|a, b| {
        created_at(&b.doc)
            .cmp(&created_at(&a.doc))
            .then(b.seq.cmp(&a.seq))
    });
    rows.into_iter().map(|s| s.doc.clone()).collect()
}
