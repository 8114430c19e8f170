//! PostgreSQL implementation of GroupRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, GroupId, Page, PageRequest, Timestamp, UserId,
};
use crate::domain::group::{GroupSettings, TravelGroup};
use crate::ports::GroupRepository;

use super::{db_error, json_column, page_bounds, page_of, to_json};

const SELECT_GROUP: &str = r#"
    SELECT id, creator_id, name, description, is_public, cover_image_url, members,
           created_at, updated_at, version
    FROM travel_groups
"#;

pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
    creator_id: Uuid,
    name: String,
    description: String,
    is_public: bool,
    cover_image_url: String,
    members: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<GroupRow> for TravelGroup {
    type Error = DomainError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        let settings = GroupSettings {
            name: row.name,
            description: row.description,
            is_public: row.is_public,
            cover_image_url: row.cover_image_url,
        };
        Ok(TravelGroup::reconstitute(
            GroupId::from_uuid(row.id),
            UserId::from_uuid(row.creator_id),
            settings,
            json_column("group members", row.members)?,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
            row.version,
        ))
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn insert(&self, group: &TravelGroup) -> Result<(), DomainError> {
        let settings = group.settings();
        sqlx::query(
            r#"
            INSERT INTO travel_groups (
                id, creator_id, name, description, is_public, cover_image_url, members,
                created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.creator().as_uuid())
        .bind(&settings.name)
        .bind(&settings.description)
        .bind(settings.is_public)
        .bind(&settings.cover_image_url)
        .bind(to_json("group members", &group.members())?)
        .bind(group.created_at().as_datetime())
        .bind(group.updated_at().as_datetime())
        .bind(group.version())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert group", e))?;
        Ok(())
    }

    async fn update(&self, group: &TravelGroup) -> Result<(), DomainError> {
        let settings = group.settings();
        let result = sqlx::query(
            r#"
            UPDATE travel_groups SET
                name = $3,
                description = $4,
                is_public = $5,
                cover_image_url = $6,
                members = $7,
                updated_at = $8,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(group.id().as_uuid())
        .bind(group.version())
        .bind(&settings.name)
        .bind(&settings.description)
        .bind(settings.is_public)
        .bind(&settings.cover_image_url)
        .bind(to_json("group members", &group.members())?)
        .bind(group.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update group", e))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(group.id()).await? {
                Some(_) => Err(DomainError::concurrent_modification("Group")),
                None => Err(DomainError::new(ErrorCode::GroupNotFound, "Group not found.")),
            };
        }
        Ok(())
    }

    async fn delete(&self, id: &GroupId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM travel_groups WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete group", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<TravelGroup>, DomainError> {
        let sql = format!("{} WHERE id = $1", SELECT_GROUP);
        let row: Option<GroupRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch group", e))?;
        row.map(TravelGroup::try_from).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Page<TravelGroup>, DomainError> {
        let (limit, offset) = page_bounds(page);
        let sql = format!("{} ORDER BY created_at DESC, id LIMIT $1 OFFSET $2", SELECT_GROUP);
        let rows: Vec<GroupRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list groups", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM travel_groups")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count groups", e))?;

        let items = rows
            .into_iter()
            .map(TravelGroup::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(page_of(items, total, page))
    }

    async fn list_by_creator(
        &self,
        creator: &UserId,
        page: PageRequest,
    ) -> Result<Page<TravelGroup>, DomainError> {
        let (limit, offset) = page_bounds(page);
        let sql = format!(
            "{} WHERE creator_id = $1 ORDER BY created_at DESC, id LIMIT $2 OFFSET $3",
            SELECT_GROUP
        );
        let rows: Vec<GroupRow> = sqlx::query_as(&sql)
            .bind(creator.as_uuid())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list groups", e))?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM travel_groups WHERE creator_id = $1")
                .bind(creator.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("count groups", e))?;

        let items = rows
            .into_iter()
            .map(TravelGroup::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(page_of(items, total, page))
    }
}
