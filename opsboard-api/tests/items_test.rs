/// Integration tests for team context resolution and item authorization.
///
/// These cover the cross-team isolation rules: items are only reachable
/// through a resolved team context, non-owners are rejected, and items in
/// other teams read as nonexistent.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, team_request, TestContext};
use opsboard_api::context::TEAM_CONTEXT_HEADER;
use opsboard_shared::models::membership::Membership;
use opsboard_shared::models::team::{CreateTeam, Team};
use opsboard_shared::models::user::User;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

async fn create_item(ctx: &TestContext, token: &str, team_id: Uuid, title: &str) -> Uuid {
    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "POST",
            "/v1/items",
            token,
            team_id,
            Some(json!({ "title": title })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let item = body_json(response).await;
    item["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_team_context_header_is_required() {
    let ctx = TestContext::new().await.unwrap();

    // Missing header
    let response = ctx
        .app
        .clone()
        .oneshot(common::auth_request("GET", "/v1/items", &ctx.jwt_token, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Malformed header
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/items")
        .header("authorization", ctx.auth_header())
        .header(TEAM_CONTEXT_HEADER, "not-a-uuid")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown team
    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "GET",
            "/v1/items",
            &ctx.jwt_token,
            Uuid::new_v4(),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_non_member_team_context_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let outsider = create_test_user(&ctx.db, false).await.unwrap();
    let outsider_token = ctx.token_for(&outsider).unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "GET",
            "/v1/items",
            &outsider_token,
            ctx.team.id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    User::delete(&ctx.db, outsider.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_superuser_still_needs_membership_for_team_context() {
    let ctx = TestContext::new().await.unwrap();
    let root = create_test_user(&ctx.db, true).await.unwrap();
    let root_token = ctx.token_for(&root).unwrap();

    // Superuser without a membership row cannot resolve the context
    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "GET",
            "/v1/items",
            &root_token,
            ctx.team.id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // With a membership, the same request succeeds
    Membership::create(&ctx.db, ctx.team.id, root.id).await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "GET",
            "/v1/items",
            &root_token,
            ctx.team.id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    User::delete(&ctx.db, root.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_item_crud_for_owner() {
    let ctx = TestContext::new().await.unwrap();

    let item_id = create_item(&ctx, &ctx.jwt_token, ctx.team.id, "Ship the release").await;
    let uri = format!("/v1/items/{}", item_id);

    // Read
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", &uri, &ctx.jwt_token, ctx.team.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let item = body_json(response).await;
    assert_eq!(item["title"], "Ship the release");
    assert_eq!(item["owner_id"], ctx.user.id.to_string());
    assert_eq!(item["team_id"], ctx.team.id.to_string());

    // Update title, clear description
    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "PATCH",
            &uri,
            &ctx.jwt_token,
            ctx.team.id,
            Some(json!({ "title": "Ship it", "description": null })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Ship it");
    assert!(updated["description"].is_null());
    // Owner and team never move
    assert_eq!(updated["owner_id"], ctx.user.id.to_string());
    assert_eq!(updated["team_id"], ctx.team.id.to_string());

    // Delete
    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "DELETE",
            &uri,
            &ctx.jwt_token,
            ctx.team.id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone afterwards
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", &uri, &ctx.jwt_token, ctx.team.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_fellow_member_cannot_touch_foreign_item() {
    let ctx = TestContext::new().await.unwrap();
    let peer = create_test_user(&ctx.db, false).await.unwrap();
    Membership::create(&ctx.db, ctx.team.id, peer.id).await.unwrap();
    let peer_token = ctx.token_for(&peer).unwrap();

    let item_id = create_item(&ctx, &ctx.jwt_token, ctx.team.id, "Owner only").await;
    let uri = format!("/v1/items/{}", item_id);

    // Same team, different owner: the item is visible as existing (403, not 404)
    for (method, body) in [
        ("GET", None),
        ("PATCH", Some(json!({ "title": "hijack" }))),
        ("DELETE", None),
    ] {
        let response = ctx
            .app
            .clone()
            .oneshot(team_request(method, &uri, &peer_token, ctx.team.id, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "method {}", method);
    }

    // And the peer's listing never includes it
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", "/v1/items", &peer_token, ctx.team.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["count"], 0);
    assert!(listing["data"].as_array().unwrap().is_empty());

    User::delete(&ctx.db, peer.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_item_in_other_team_reads_as_missing() {
    let ctx = TestContext::new().await.unwrap();

    // Same user, second team
    let second = Team::create_with_member(
        &ctx.db,
        CreateTeam {
            name: format!("second-{}", Uuid::new_v4()),
        },
        ctx.user.id,
    )
    .await
    .unwrap();

    let item_id = create_item(&ctx, &ctx.jwt_token, ctx.team.id, "Stays home").await;
    let uri = format!("/v1/items/{}", item_id);

    // Resolving the other team hides the item entirely
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", &uri, &ctx.jwt_token, second.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Listing under the other team is empty too
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", "/v1/items", &ctx.jwt_token, second.id, None))
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing["count"], 0);

    Team::delete(&ctx.db, second.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_superuser_item_access() {
    let ctx = TestContext::new().await.unwrap();
    let root = create_test_user(&ctx.db, true).await.unwrap();
    Membership::create(&ctx.db, ctx.team.id, root.id).await.unwrap();
    let root_token = ctx.token_for(&root).unwrap();

    let item_id = create_item(&ctx, &ctx.jwt_token, ctx.team.id, "Audited").await;
    let uri = format!("/v1/items/{}", item_id);

    // Superuser can read and update an item they do not own
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", &uri, &root_token, ctx.team.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "PATCH",
            &uri,
            &root_token,
            ctx.team.id,
            Some(json!({ "title": "Audited and amended" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Superuser listing is global
    let response = ctx
        .app
        .clone()
        .oneshot(team_request("GET", "/v1/items", &root_token, ctx.team.id, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert!(listing["count"].as_i64().unwrap() >= 1);

    User::delete(&ctx.db, root.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_item_listing_pagination() {
    let ctx = TestContext::new().await.unwrap();

    for i in 0..5 {
        create_item(&ctx, &ctx.jwt_token, ctx.team.id, &format!("item {}", i)).await;
    }

    let response = ctx
        .app
        .clone()
        .oneshot(team_request(
            "GET",
            "/v1/items?limit=2&offset=2",
            &ctx.jwt_token,
            ctx.team.id,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;

    // Count reflects the full set, data the requested page
    assert_eq!(listing["count"], 5);
    assert_eq!(listing["data"].as_array().unwrap().len(), 2);

    ctx.cleanup().await.unwrap();
}
