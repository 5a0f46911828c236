/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use opsboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = opsboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, context::CurrentUser, error::ApiError};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use opsboard_shared::{auth::jwt, models::user::User};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── /v1/                          # API v1 (versioned)
/// │   ├── /auth/                    # Authentication (public)
/// │   │   ├── POST /register
/// │   │   ├── POST /login
/// │   │   └── POST /refresh
/// │   ├── /users/me                 # Current user profile (authenticated)
/// │   ├── /teams/                   # Team management (authenticated)
/// │   ├── /items/                   # Team-scoped items (authenticated)
/// │   └── /onboarding/              # First-team onboarding (authenticated)
/// │       ├── POST /create-team
/// │       └── POST /join-team
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Current user profile
    let user_routes = Router::new()
        .route("/me", get(routes::users::get_me))
        .route("/me", patch(routes::users::update_me));

    // Team management
    let team_routes = Router::new()
        .route("/", post(routes::teams::create_team))
        .route("/", get(routes::teams::list_teams))
        .route("/:id", get(routes::teams::get_team))
        .route("/:id/members", post(routes::teams::add_member))
        .route("/:id/members/:user_id", delete(routes::teams::remove_member));

    // Team-scoped items; every route resolves team context from headers
    let item_routes = Router::new()
        .route("/", post(routes::items::create_item))
        .route("/", get(routes::items::list_items))
        .route("/:id", get(routes::items::get_item))
        .route("/:id", patch(routes::items::update_item))
        .route("/:id", delete(routes::items::delete_item));

    // Onboarding
    let onboarding_routes = Router::new()
        .route("/create-team", post(routes::onboarding::create_first_team))
        .route("/join-team", post(routes::onboarding::join_team));

    // Everything except /auth requires a valid access token
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/teams", team_routes)
        .nest("/items", item_routes)
        .nest("/onboarding", onboarding_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins = parse_cors_origins(&state.config.api.cors_origins);

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization header,
/// loads the user record, and injects `CurrentUser` into request extensions.
///
/// The user row is loaded fresh on every request so deactivation takes
/// effect immediately, regardless of token lifetime.
///
/// # Errors
///
/// - `401 Unauthorized`: missing header, invalid/expired token, inactive user
/// - `400 Bad Request`: header present but not a Bearer token
/// - `404 Not Found`: token subject no longer exists
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("Inactive user".to_string()));
    }

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Parses configured CORS origins into header values
///
/// Entries that are not valid header values are skipped with a warning
/// rather than taking the whole allow-list down with them.
fn parse_cors_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cors_origins_keeps_valid_entries() {
        let origins = vec![
            "https://app.example.com".to_string(),
            "http://localhost:3000".to_string(),
        ];
        let parsed = parse_cors_origins(&origins);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], "https://app.example.com");
    }

    #[test]
    fn test_parse_cors_origins_skips_unparseable_entries() {
        let origins = vec![
            "https://app.example.com".to_string(),
            "https://bad\norigin".to_string(),
        ];
        let parsed = parse_cors_origins(&origins);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], "https://app.example.com");
    }
}
