/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user/team creation
/// - JWT token generation
/// - Request helpers
///
/// All integration tests require a running PostgreSQL instance reachable
/// via DATABASE_URL, plus JWT_SECRET, and are marked `#[ignore]` so the
/// default test run stays database-free.

use axum::body::Body;
use axum::http::Request;
use opsboard_api::app::{build_router, AppState};
use opsboard_api::config::Config;
use opsboard_api::context::TEAM_CONTEXT_HEADER;
use opsboard_shared::auth::jwt::{create_token, Claims, TokenType};
use opsboard_shared::auth::password;
use opsboard_shared::models::team::{CreateTeam, Team};
use opsboard_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Password used for all test accounts
pub const TEST_PASSWORD: &str = "TestP@ssw0rd1";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub team: Team,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user and team
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = create_test_user(&db, false).await?;

        let team = Team::create_with_member(
            &db,
            CreateTeam {
                name: format!("test-team-{}", Uuid::new_v4()),
            },
            user.id,
        )
        .await?;

        let claims = Claims::new(user.id, TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            team,
            jwt_token,
        })
    }

    /// Returns authorization header value for the context's default user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Issues an access token for an arbitrary user
    pub fn token_for(&self, user: &User) -> anyhow::Result<String> {
        let claims = Claims::new(user.id, TokenType::Access);
        Ok(create_token(&claims, &self.config.jwt.secret)?)
    }

    /// Cleans up test data
    ///
    /// Team deletion cascades to memberships and items; extra users created
    /// by a test must be deleted by the test itself.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        Team::delete(&self.db, self.team.id).await?;
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Creates a user with a real Argon2id hash so login flows work
pub async fn create_test_user(db: &PgPool, superuser: bool) -> anyhow::Result<User> {
    let password_hash = password::hash_password(TEST_PASSWORD)?;

    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash,
            full_name: Some("Test User".to_string()),
        },
    )
    .await?;

    if superuser {
        sqlx::query("UPDATE users SET is_superuser = TRUE WHERE id = $1")
            .bind(user.id)
            .execute(db)
            .await?;

        let user = User::find_by_id(db, user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("superuser vanished after update"))?;
        return Ok(user);
    }

    Ok(user)
}

/// Builds an authenticated JSON request with a team context header
pub fn team_request(
    method: &str,
    uri: &str,
    token: &str,
    team_id: Uuid,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(TEAM_CONTEXT_HEADER, team_id.to_string())
        .header("content-type", "application/json");

    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Builds an authenticated JSON request without a team context header
pub fn auth_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");

    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
