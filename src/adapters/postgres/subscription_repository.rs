//! PostgreSQL implementation of SubscriptionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::foundation::{DomainError, SubscriptionId, Timestamp, UserId};
use crate::ports::SubscriptionRepository;

use super::{corrupt, db_error};

const COLUMNS: &str = "id, user_id, stripe_subscription_id, stripe_price_id, status, \
    current_period_start, current_period_end, cancel_at_period_end, trial_start, trial_end, \
    ended_at, created_at, updated_at";

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    stripe_subscription_id: String,
    stripe_price_id: Option<String>,
    status: String,
    current_period_start: Option<DateTime<Utc>>,
    current_period_end: Option<DateTime<Utc>>,
    cancel_at_period_end: bool,
    trial_start: Option<DateTime<Utc>>,
    trial_end: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status: SubscriptionStatus = row
            .status
            .parse()
            .map_err(|e| corrupt("subscription status", e))?;
        let ts = |dt: Option<DateTime<Utc>>| dt.map(Timestamp::from_datetime);

        Ok(Subscription::reconstitute(
            SubscriptionId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.stripe_subscription_id,
            row.stripe_price_id,
            status,
            ts(row.current_period_start),
            ts(row.current_period_end),
            row.cancel_at_period_end,
            ts(row.trial_start),
            ts(row.trial_end),
            ts(row.ended_at),
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

fn datetime(ts: Option<&Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn upsert(&self, subscription: &Subscription) -> Result<Subscription, DomainError> {
        // The first insert owns the row identity; later writes keep id and created_at.
        let sql = format!(
            r#"
            INSERT INTO subscriptions ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (stripe_subscription_id) DO UPDATE SET
                user_id = EXCLUDED.user_id,
                stripe_price_id = EXCLUDED.stripe_price_id,
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                trial_start = EXCLUDED.trial_start,
                trial_end = EXCLUDED.trial_end,
                ended_at = EXCLUDED.ended_at,
                updated_at = EXCLUDED.updated_at
            RETURNING {columns}
            "#,
            columns = COLUMNS
        );

        let row: SubscriptionRow = sqlx::query_as(&sql)
            .bind(subscription.id().as_uuid())
            .bind(subscription.user_id().as_uuid())
            .bind(subscription.stripe_subscription_id())
            .bind(subscription.stripe_price_id())
            .bind(subscription.status().as_str())
            .bind(datetime(subscription.current_period_start()))
            .bind(datetime(subscription.current_period_end()))
            .bind(subscription.cancel_at_period_end())
            .bind(datetime(subscription.trial_start()))
            .bind(datetime(subscription.trial_end()))
            .bind(datetime(subscription.ended_at()))
            .bind(subscription.created_at().as_datetime())
            .bind(subscription.updated_at().as_datetime())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("upsert subscription", e))?;

        Subscription::try_from(row)
    }

    async fn find_by_stripe_id(&self, stripe_subscription_id: &str) -> Result<Option<Subscription>, DomainError> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE stripe_subscription_id = $1",
            COLUMNS
        );
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(stripe_subscription_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch subscription", e))?;
        row.map(Subscription::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC",
            COLUMNS
        );
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list subscriptions", e))?;
        rows.into_iter().map(Subscription::try_from).collect()
    }
}
