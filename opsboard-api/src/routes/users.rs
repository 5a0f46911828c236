/// Current user profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/users/me` - Get the authenticated user's profile
/// - `PATCH /v1/users/me` - Update email, password, or display name

use crate::{
    app::AppState,
    context::CurrentUser,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::double_option,
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use opsboard_shared::{
    auth::password,
    models::user::{UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Public view of a user record
///
/// Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile update request
///
/// Absent fields are left unchanged. `full_name` may be set to null to
/// clear the display name.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub full_name: Option<Option<String>>,
}

/// Get current user profile
///
/// # Endpoint
///
/// ```text
/// GET /v1/users/me
/// Authorization: Bearer <access_token>
/// ```
pub async fn get_me(Extension(current): Extension<CurrentUser>) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(current.0)))
}

/// Update current user profile
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/users/me
/// Authorization: Bearer <access_token>
/// Content-Type: application/json
///
/// {
///   "email": "new@example.com",
///   "password": "NewP@ssw0rd1",
///   "full_name": null
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateMeRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let password_hash = match &req.password {
        Some(new_password) => {
            password::validate_password_strength(new_password).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;
            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        current.0.id,
        UpdateUser {
            email: req.email,
            password_hash,
            full_name: req.full_name,
            is_active: None,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(updated)))
}
