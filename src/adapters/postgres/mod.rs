//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Every aggregate table carries a `version` column. Updates are
//! conditional on the version the aggregate was read at; zero affected
//! rows means another writer got there first.
//!
//! Embedded lists (saved trip items, group members, travel preferences)
//! are stored as JSONB on the owning row.

mod group_repository;
mod post_repository;
mod referral_repository;
mod subscription_repository;
mod trip_repository;
mod user_repository;
mod webhook_event_repository;

pub use group_repository::PostgresGroupRepository;
pub use post_repository::PostgresPostRepository;
pub use referral_repository::PostgresReferralRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use trip_repository::PostgresTripRepository;
pub use user_repository::PostgresUserRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;

use crate::domain::foundation::{DomainError, ErrorCode, Page, PageRequest};

const UNIQUE_VIOLATION: &str = "23505";

/// Field reported for each unique constraint in the schema.
fn constraint_field(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "username",
        "users_email_key" => "email",
        "users_referral_code_key" => "referral code",
        "referrals_referred_id_key" => "referred user",
        "travel_groups_name_key" => "name",
        _ => "id",
    }
}

/// Maps a sqlx error, turning unique violations into `Duplicate`.
fn db_error(action: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let field = db_err.constraint().map(constraint_field).unwrap_or("id");
            return DomainError::duplicate(field);
        }
    }
    tracing::error!(error = %err, action, "Database error");
    DomainError::database(format!("Failed to {}: {}", action, err))
}

fn corrupt(what: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid stored {}: {}", what, detail),
    )
}

fn json_column<T: serde::de::DeserializeOwned>(
    what: &str,
    value: serde_json::Value,
) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| corrupt(what, e))
}

fn to_json<T: serde::Serialize>(what: &str, value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| corrupt(what, e))
}

fn page_bounds(page: PageRequest) -> (i64, i64) {
    (i64::from(page.limit()), page.offset() as i64)
}

fn page_of<T>(items: Vec<T>, total: i64, page: PageRequest) -> Page<T> {
    Page::new(items, total.max(0) as u64, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_constraints_name_their_field() {
        assert_eq!(constraint_field("users_email_key"), "email");
        assert_eq!(constraint_field("users_referral_code_key"), "referral code");
        assert_eq!(constraint_field("travel_groups_name_key"), "name");
        assert_eq!(constraint_field("trips_pkey"), "id");
    }

    #[test]
    fn page_bounds_follow_request() {
        assert_eq!(page_bounds(PageRequest::new(Some(3), Some(20))), (20, 40));
    }
}
