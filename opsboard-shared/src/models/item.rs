/// Item model and database operations
///
/// Items always belong to exactly one team and have exactly one owner.
/// Both references are stamped at creation and never updated; `update`
/// only touches title and description.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Item model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    /// Unique item ID (UUID v4)
    pub id: Uuid,

    /// Item title
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// The user who created the item (immutable)
    pub owner_id: Uuid,

    /// The team the item belongs to (immutable)
    pub team_id: Uuid,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// When the item was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new item
///
/// Owner and team are not part of the input: handlers stamp them from the
/// authenticated user and the resolved team context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// Item title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Input for updating an existing item
///
/// All fields are optional. Only non-None fields are written; owner and
/// team cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl Item {
    /// Creates a new item stamped with its owner and team
    pub async fn create(
        pool: &PgPool,
        data: CreateItem,
        owner_id: Uuid,
        team_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (title, description, owner_id, team_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, owner_id, team_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(owner_id)
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Finds an item by ID within a team
    ///
    /// Resolution is always team-scoped for non-superusers: an item that
    /// exists under a different team does not resolve here, which is what
    /// makes NotFound take precedence over Forbidden.
    pub async fn find_by_team(
        pool: &PgPool,
        team_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, team_id, created_at, updated_at
            FROM items
            WHERE team_id = $1 AND id = $2
            "#,
        )
        .bind(team_id)
        .bind(item_id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Lists items owned by a user within a team, with pagination
    ///
    /// Both conditions are required: a user's items in a team they are not
    /// currently operating in are invisible.
    pub async fn list_by_owner_and_team(
        pool: &PgPool,
        owner_id: Uuid,
        team_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, team_id, created_at, updated_at
            FROM items
            WHERE owner_id = $1 AND team_id = $2
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner_id)
        .bind(team_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Counts items owned by a user within a team
    pub async fn count_by_owner_and_team(
        pool: &PgPool,
        owner_id: Uuid,
        team_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM items WHERE owner_id = $1 AND team_id = $2",
        )
        .bind(owner_id)
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists all items regardless of owner or team, with pagination
    ///
    /// Superuser-only path; ordinary listing goes through
    /// [`Item::list_by_owner_and_team`].
    pub async fn list_all(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, team_id, created_at, updated_at
            FROM items
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Counts all items in the system
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates an item's title and/or description
    ///
    /// Returns the updated item, or None if the id is unknown. Owner and
    /// team are never touched.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE items SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, owner_id, team_id, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Item>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let item = q.fetch_optional(pool).await?;

        Ok(item)
    }

    /// Deletes an item by ID
    ///
    /// Returns true if the item was deleted, false if it didn't exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
