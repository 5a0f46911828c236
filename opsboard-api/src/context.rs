/// Per-request identity and team context
///
/// Two pieces of context flow through every team-scoped request:
///
/// 1. `CurrentUser` - the authenticated user, loaded from the database by
///    the auth middleware and stored in request extensions.
/// 2. The active team, resolved from the `X-Current-Team-ID` header by
///    `resolve_team_context`. Team context lives only in the request; it
///    is never encoded into tokens, so a stale token can never smuggle a
///    revoked membership past the check.

use axum::http::HeaderMap;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use opsboard_shared::models::membership::Membership;
use opsboard_shared::models::team::Team;
use opsboard_shared::models::user::User;

/// Header carrying the team a request operates in
pub const TEAM_CONTEXT_HEADER: &str = "X-Current-Team-ID";

/// Authenticated user for the current request
///
/// Inserted into request extensions by the auth middleware and extracted
/// in handlers via `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolves the active team for a request
///
/// Reads `X-Current-Team-ID` from the request headers, loads the team, and
/// verifies the user's membership. Membership is the only grant: superusers
/// without a membership row are rejected like anyone else.
///
/// # Errors
///
/// - `400 Bad Request`: header missing or not a valid UUID
/// - `404 Not Found`: no team with that ID
/// - `403 Forbidden`: user is not a member of the team
pub async fn resolve_team_context(
    pool: &PgPool,
    user: &User,
    headers: &HeaderMap,
) -> Result<Team, ApiError> {
    let raw = headers
        .get(TEAM_CONTEXT_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Missing {} header", TEAM_CONTEXT_HEADER))
        })?;

    let team_id = Uuid::parse_str(raw).map_err(|_| {
        ApiError::BadRequest(format!("Invalid {} header: not a UUID", TEAM_CONTEXT_HEADER))
    })?;

    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    let is_member = Membership::exists(pool, team.id, user.id).await?;
    if !is_member {
        return Err(ApiError::Forbidden(
            "User is not a member of this team".to_string(),
        ));
    }

    Ok(team)
}
