//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::user::{Profile, ReferralCode, Tier, User};
use crate::ports::UserRepository;

use super::{corrupt, db_error, json_column, to_json};

const SELECT_USER: &str = r#"
    SELECT id, username, email, password_hash, tier, stripe_customer_id, subscription_id,
           referral_code, referred_by, bio, profile_picture_url, travel_preferences,
           created_at, updated_at, version
    FROM users
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, clause: &str, value: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("{} WHERE {} = $1", SELECT_USER, clause);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch user", e))?;
        row.map(User::try_from).transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    tier: String,
    stripe_customer_id: Option<String>,
    subscription_id: Option<String>,
    referral_code: Option<String>,
    referred_by: Option<Uuid>,
    bio: String,
    profile_picture_url: String,
    travel_preferences: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let tier: Tier = row.tier.parse().map_err(|e| corrupt("tier", e))?;
        let profile = Profile {
            bio: row.bio,
            profile_picture_url: row.profile_picture_url,
            travel_preferences: json_column("travel preferences", row.travel_preferences)?,
        };

        Ok(User::reconstitute(
            UserId::from_uuid(row.id),
            row.username,
            row.email,
            row.password_hash,
            tier,
            row.stripe_customer_id,
            row.subscription_id,
            row.referral_code.map(ReferralCode::from_stored),
            row.referred_by.map(UserId::from_uuid),
            profile,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
            row.version,
        ))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let profile = user.profile();
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, tier, stripe_customer_id, subscription_id,
                referral_code, referred_by, bio, profile_picture_url, travel_preferences,
                created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.tier().as_str())
        .bind(user.stripe_customer_id())
        .bind(user.subscription_id())
        .bind(user.referral_code().map(|c| c.as_str()))
        .bind(user.referred_by().map(|id| *id.as_uuid()))
        .bind(&profile.bio)
        .bind(&profile.profile_picture_url)
        .bind(to_json("travel preferences", &profile.travel_preferences)?)
        .bind(user.created_at().as_datetime())
        .bind(user.updated_at().as_datetime())
        .bind(user.version())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert user", e))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let profile = user.profile();
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = $3,
                email = $4,
                password_hash = $5,
                tier = $6,
                stripe_customer_id = $7,
                subscription_id = $8,
                referral_code = $9,
                bio = $10,
                profile_picture_url = $11,
                travel_preferences = $12,
                updated_at = $13,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.version())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.tier().as_str())
        .bind(user.stripe_customer_id())
        .bind(user.subscription_id())
        .bind(user.referral_code().map(|c| c.as_str()))
        .bind(&profile.bio)
        .bind(&profile.profile_picture_url)
        .bind(to_json("travel preferences", &profile.travel_preferences)?)
        .bind(user.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update user", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::concurrent_modification("User"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_USER);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch user", e))?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", &email.trim().to_lowercase()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, DomainError> {
        self.find_one("referral_code", code).await
    }
}
