//! PostgreSQL implementation of TripRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, TripId, UserId};
use crate::domain::trip::{Trip, TripDetails};
use crate::ports::TripRepository;

use super::{db_error, json_column, to_json};

const SELECT_TRIP: &str = r#"
    SELECT id, user_id, trip_name, destination_city, destination_country, start_date, end_date,
           notes, is_public, budget, saved_flights, saved_accommodations, saved_activities,
           created_at, updated_at, version
    FROM trips
"#;

pub struct PostgresTripRepository {
    pool: PgPool,
}

impl PostgresTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    user_id: Uuid,
    trip_name: String,
    destination_city: String,
    destination_country: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    notes: String,
    is_public: bool,
    budget: f64,
    saved_flights: serde_json::Value,
    saved_accommodations: serde_json::Value,
    saved_activities: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<TripRow> for Trip {
    type Error = DomainError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        let details = TripDetails {
            trip_name: row.trip_name,
            destination_city: row.destination_city,
            destination_country: row.destination_country,
            start_date: Timestamp::from_datetime(row.start_date),
            end_date: Timestamp::from_datetime(row.end_date),
            notes: row.notes,
            is_public: row.is_public,
            budget: row.budget,
        };

        Ok(Trip::reconstitute(
            TripId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            details,
            json_column("saved flights", row.saved_flights)?,
            json_column("saved accommodations", row.saved_accommodations)?,
            json_column("saved activities", row.saved_activities)?,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
            row.version,
        ))
    }
}

#[async_trait]
impl TripRepository for PostgresTripRepository {
    async fn insert(&self, trip: &Trip) -> Result<(), DomainError> {
        let details = trip.details();
        sqlx::query(
            r#"
            INSERT INTO trips (
                id, user_id, trip_name, destination_city, destination_country, start_date,
                end_date, notes, is_public, budget, saved_flights, saved_accommodations,
                saved_activities, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(trip.id().as_uuid())
        .bind(trip.user_id().as_uuid())
        .bind(&details.trip_name)
        .bind(&details.destination_city)
        .bind(&details.destination_country)
        .bind(details.start_date.as_datetime())
        .bind(details.end_date.as_datetime())
        .bind(&details.notes)
        .bind(details.is_public)
        .bind(details.budget)
        .bind(to_json("saved flights", &trip.saved_flights())?)
        .bind(to_json("saved accommodations", &trip.saved_accommodations())?)
        .bind(to_json("saved activities", &trip.saved_activities())?)
        .bind(trip.created_at().as_datetime())
        .bind(trip.updated_at().as_datetime())
        .bind(trip.version())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert trip", e))?;

        Ok(())
    }

    async fn update(&self, trip: &Trip) -> Result<(), DomainError> {
        let details = trip.details();
        let result = sqlx::query(
            r#"
            UPDATE trips SET
                trip_name = $3,
                destination_city = $4,
                destination_country = $5,
                start_date = $6,
                end_date = $7,
                notes = $8,
                is_public = $9,
                budget = $10,
                saved_flights = $11,
                saved_accommodations = $12,
                saved_activities = $13,
                updated_at = $14,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(trip.id().as_uuid())
        .bind(trip.version())
        .bind(&details.trip_name)
        .bind(&details.destination_city)
        .bind(&details.destination_country)
        .bind(details.start_date.as_datetime())
        .bind(details.end_date.as_datetime())
        .bind(&details.notes)
        .bind(details.is_public)
        .bind(details.budget)
        .bind(to_json("saved flights", &trip.saved_flights())?)
        .bind(to_json("saved accommodations", &trip.saved_accommodations())?)
        .bind(to_json("saved activities", &trip.saved_activities())?)
        .bind(trip.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update trip", e))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(trip.id()).await? {
                Some(_) => Err(DomainError::concurrent_modification("Trip")),
                None => Err(DomainError::new(ErrorCode::TripNotFound, "Trip not found.")),
            };
        }
        Ok(())
    }

    async fn delete(&self, id: &TripId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete trip", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_TRIP);
        let row: Option<TripRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch trip", e))?;
        row.map(Trip::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Trip>, DomainError> {
        let sql = format!("{} WHERE user_id = $1 ORDER BY created_at DESC", SELECT_TRIP);
        let rows: Vec<TripRow> = sqlx::query_as(&sql)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list trips", e))?;
        rows.into_iter().map(Trip::try_from).collect()
    }
}
