//! PostgreSQL implementation of ReferralRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ReferralId, Timestamp, UserId};
use crate::domain::referral::{Referral, ReferralStatus};
use crate::ports::ReferralRepository;

use super::{corrupt, db_error};

pub struct PostgresReferralRepository {
    pool: PgPool,
}

impl PostgresReferralRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReferralRow {
    id: Uuid,
    referrer_id: Uuid,
    referred_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReferralRow> for Referral {
    type Error = DomainError;

    fn try_from(row: ReferralRow) -> Result<Self, Self::Error> {
        let status: ReferralStatus = row.status.parse().map_err(|e| corrupt("referral status", e))?;
        Ok(Referral::reconstitute(
            ReferralId::from_uuid(row.id),
            UserId::from_uuid(row.referrer_id),
            UserId::from_uuid(row.referred_id),
            status,
            Timestamp::from_datetime(row.created_at),
            row.completed_at.map(Timestamp::from_datetime),
        ))
    }
}

#[async_trait]
impl ReferralRepository for PostgresReferralRepository {
    async fn insert(&self, referral: &Referral) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO referrals (id, referrer_id, referred_id, status, created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(referral.id().as_uuid())
        .bind(referral.referrer_id().as_uuid())
        .bind(referral.referred_id().as_uuid())
        .bind(referral.status().as_str())
        .bind(referral.created_at().as_datetime())
        .bind(referral.completed_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert referral", e))?;
        Ok(())
    }

    async fn update(&self, referral: &Referral) -> Result<(), DomainError> {
        sqlx::query("UPDATE referrals SET status = $2, completed_at = $3 WHERE id = $1")
            .bind(referral.id().as_uuid())
            .bind(referral.status().as_str())
            .bind(referral.completed_at().map(|t| *t.as_datetime()))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("update referral", e))?;
        Ok(())
    }

    async fn find_pending_for_referred(&self, referred: &UserId) -> Result<Option<Referral>, DomainError> {
        let row: Option<ReferralRow> = sqlx::query_as(
            r#"
            SELECT id, referrer_id, referred_id, status, created_at, completed_at
            FROM referrals
            WHERE referred_id = $1 AND status = 'pending'
            "#,
        )
        .bind(referred.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch referral", e))?;
        row.map(Referral::try_from).transpose()
    }

    async fn count_completed_by_referrer(&self, referrer: &UserId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM referrals WHERE referrer_id = $1 AND status = 'completed'",
        )
        .bind(referrer.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count referrals", e))?;
        Ok(count.max(0) as u64)
    }
}
