/// First-team onboarding endpoints
///
/// New accounts start with zero team memberships and cannot resolve a team
/// context, so they cannot touch items. Onboarding is the one-time step
/// that gets a user into their first team, either by founding one or by
/// joining an existing one by id.
///
/// # Endpoints
///
/// - `POST /v1/onboarding/create-team` - Found a team and become its first member
/// - `POST /v1/onboarding/join-team` - Join an existing team by id
///
/// Both endpoints are gated on the caller having no memberships yet.

use crate::{
    app::AppState,
    context::CurrentUser,
    error::{ApiError, ApiResult},
    routes::teams::TeamResponse,
};
use axum::{extract::State, Extension, Json};
use opsboard_shared::models::{
    membership::Membership,
    team::{CreateTeam, Team},
};
use serde::Deserialize;
use validator::Validate;

/// Create-first-team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFirstTeamRequest {
    /// Team name (unique across the system)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Join-team request
#[derive(Debug, Deserialize)]
pub struct JoinTeamRequest {
    /// ID of the team to join
    pub team_id: uuid::Uuid,
}

/// Rejects callers that already belong to a team
async fn require_not_onboarded(state: &AppState, user_id: uuid::Uuid) -> ApiResult<()> {
    let memberships = Membership::count_for_user(&state.db, user_id).await?;
    if memberships > 0 {
        return Err(ApiError::BadRequest(
            "User has already completed onboarding".to_string(),
        ));
    }
    Ok(())
}

/// Found a new team as the caller's first team
///
/// Creates the team and links the caller as its first member in one
/// transaction.
///
/// # Endpoint
///
/// ```text
/// POST /v1/onboarding/create-team
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// { "name": "engineering" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Caller already belongs to a team
/// - `409 Conflict`: Team name already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_first_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateFirstTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    req.validate()?;

    require_not_onboarded(&state, current.0.id).await?;

    let team = Team::create_with_member(&state.db, CreateTeam { name: req.name }, current.0.id)
        .await?;

    Ok(Json(TeamResponse::from(team)))
}

/// Join an existing team by id
///
/// # Endpoint
///
/// ```text
/// POST /v1/onboarding/join-team
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// { "team_id": "6f1f6a3e-..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Caller already belongs to a team
/// - `404 Not Found`: No team with that id
pub async fn join_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<JoinTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    require_not_onboarded(&state, current.0.id).await?;

    let team = Team::find_by_id(&state.db, req.team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    // The zero-membership gate already rules this out, but the check is
    // racy across concurrent requests; re-check under the unique key.
    if Membership::exists(&state.db, team.id, current.0.id).await? {
        return Err(ApiError::BadRequest(
            "User is already a member of this team".to_string(),
        ));
    }

    Membership::create(&state.db, team.id, current.0.id).await?;

    Ok(Json(TeamResponse::from(team)))
}
