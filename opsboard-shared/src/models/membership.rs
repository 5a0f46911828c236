/// Membership model and database operations
///
/// A membership is a pure relation between a user and a team: existence of
/// a row means the user belongs to the team. A user is "onboarded" exactly
/// when their membership count is greater than zero, and that transition is
/// one-way in practice — no handler removes a user's last membership.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Membership model representing the user-team relation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Team ID
    pub team_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a membership (adds a user to a team)
    ///
    /// # Errors
    ///
    /// Returns an error if the membership already exists (primary key
    /// violation), the team or user does not exist (foreign key violation),
    /// or the database is unreachable. Callers check for an existing link
    /// first so a duplicate surfaces as a client error, not a constraint
    /// violation.
    pub async fn create(pool: &PgPool, team_id: Uuid, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (team_id, user_id)
            VALUES ($1, $2)
            RETURNING team_id, user_id, created_at
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Checks whether a user belongs to a team
    pub async fn exists(pool: &PgPool, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Deletes a membership (removes a user from a team)
    ///
    /// Returns true if a row was deleted, false if the membership did not
    /// exist. Callers treat the false case as a client error rather than a
    /// silent no-op.
    pub async fn delete(pool: &PgPool, team_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts the teams a user belongs to
    ///
    /// Zero means the user has not completed onboarding.
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM memberships WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
