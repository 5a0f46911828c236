/// Team and membership management endpoints
///
/// # Endpoints
///
/// - `POST /v1/teams` - Create a team (creator joins automatically)
/// - `GET /v1/teams` - List teams the current user belongs to
/// - `GET /v1/teams/:id` - Get a single team
/// - `POST /v1/teams/:id/members` - Add a member
/// - `DELETE /v1/teams/:id/members/:user_id` - Remove a member
///
/// Membership is flat: there are no roles, so any member may manage the
/// team's roster. Superusers may manage any team without being a member.

use crate::{
    app::AppState,
    context::CurrentUser,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use opsboard_shared::{
    auth::authorization,
    models::{
        membership::Membership,
        team::{CreateTeam, Team},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Public view of a team record
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name (unique across the system)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add to the team
    pub user_id: Uuid,
}

/// Membership response
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        Self {
            team_id: m.team_id,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

/// Create a new team
///
/// The creator is linked as a member in the same transaction, so a team
/// can never exist without at least one member.
///
/// # Endpoint
///
/// ```text
/// POST /v1/teams
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// { "name": "engineering" }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Team name already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    req.validate()?;

    let team = Team::create_with_member(&state.db, CreateTeam { name: req.name }, current.0.id)
        .await?;

    Ok(Json(TeamResponse::from(team)))
}

/// List teams the current user belongs to
///
/// Ordered by when the user joined. Superusers see only their own
/// memberships here, same as everyone else.
///
/// # Endpoint
///
/// ```text
/// GET /v1/teams
/// Authorization: Bearer <access_token>
/// ```
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<TeamResponse>>> {
    let teams = Team::list_for_user(&state.db, current.0.id).await?;

    Ok(Json(teams.into_iter().map(TeamResponse::from).collect()))
}

/// Get a single team
///
/// # Endpoint
///
/// ```text
/// GET /v1/teams/:id
/// Authorization: Bearer <access_token>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Not a member (and not a superuser)
/// - `404 Not Found`: Unknown team
pub async fn get_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<TeamResponse>> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    authorization::check_team_access(&state.db, &current.0, team.id).await?;

    Ok(Json(TeamResponse::from(team)))
}

/// Add a user to a team
///
/// # Endpoint
///
/// ```text
/// POST /v1/teams/:id/members
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// { "user_id": "uuid" }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member (and not a superuser)
/// - `404 Not Found`: Unknown team or unknown user
/// - `409 Conflict`: User is already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<MembershipResponse>> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    authorization::check_team_access(&state.db, &current.0, team.id).await?;

    let target = User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if Membership::exists(&state.db, team.id, target.id).await? {
        return Err(ApiError::Conflict(
            "User is already a member of this team".to_string(),
        ));
    }

    let membership = Membership::create(&state.db, team.id, target.id).await?;

    Ok(Json(MembershipResponse::from(membership)))
}

/// Remove a user from a team
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/teams/:id/members/:user_id
/// Authorization: Bearer <access_token>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member (and not a superuser)
/// - `404 Not Found`: Unknown team, or the user is not a member
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((team_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    authorization::check_team_access(&state.db, &current.0, team.id).await?;

    let removed = Membership::delete(&state.db, team.id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "User is not a member of this team".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({ "status": "removed" })))
}
