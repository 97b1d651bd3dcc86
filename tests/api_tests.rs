//! HTTP surface tests: routing, request validation, status codes, and the
//! response envelope, driven through the router without a socket.

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use backend::datastore::{Datastore, Role};
use backend::routes;
use common::{seed_user, test_context};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

fn submission_body(user_id: i64, image_url: &str) -> Value {
    json!({
        "user_id": user_id,
        "submission_type": "waste",
        "location": "Community Park",
        "latitude": 12.97,
        "longitude": 77.59,
        "description": "overflowing bins",
        "image_url": image_url,
    })
}

#[tokio::test]
async fn login_distinguishes_unknown_user_and_bad_password() {
    let ctx = test_context();
    seed_user(&ctx.store, "alice", Role::User).await;
    let router = routes::router(ctx.state);

    let (status, body) = post_json(
        &router,
        "/login",
        json!({"username": "nobody", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1003);

    let (status, body) = post_json(
        &router,
        "/login",
        json!({"username": "alice", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);

    let (status, body) = post_json(
        &router,
        "/login",
        json!({"username": "alice", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["message"], "Login successful");
    assert_eq!(body["resp_data"]["user"]["username"], "alice");
    // The stored plaintext password never serializes into a response.
    assert!(body["resp_data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn duplicate_username_or_email_is_a_conflict() {
    let ctx = test_context();
    let router = routes::router(ctx.state);

    let (status, _) = post_json(
        &router,
        "/users/create",
        json!({"username": "alice", "email": "alice@example.com",
               "password": "secret", "role": "user"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &router,
        "/users/create",
        json!({"username": "alice", "email": "other@example.com",
               "password": "secret", "role": "user"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);
}

#[tokio::test]
async fn invalid_role_is_rejected_before_any_write() {
    let ctx = test_context();
    let store = ctx.store.clone();
    let router = routes::router(ctx.state);

    let (status, _) = post_json(
        &router,
        "/users/create",
        json!({"username": "eve", "email": "eve@example.com",
               "password": "secret", "role": "admin"}),
    )
    .await;
    assert!(status.is_client_error());
    assert!(store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_submission_within_window_is_rejected() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let router = routes::router(ctx.state);

    let (status, body) =
        post_json(&router, "/submissions", submission_body(alice.id, "img2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["resp_data"]["message"],
        "Submission created successfully"
    );
    assert_eq!(
        body["resp_data"]["submission"]["genai_analysis"]["result"],
        "Yes, this seems legit"
    );

    let (status, body) =
        post_json(&router, "/submissions", submission_body(alice.id, "img2")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn submission_listing_defaults_to_approved_and_validates_status() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let moderator = seed_user(&ctx.store, "mod", Role::Moderator).await;
    let router = routes::router(ctx.state);

    let (_, body) = post_json(&router, "/submissions", submission_body(alice.id, "img1")).await;
    let submission_id = body["resp_data"]["submission"]["id"].as_i64().unwrap();

    // Still pending, so the default (approved) listing is empty.
    let (status, body) = get(&router, "/submissions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 0);

    let (_, body) = get(&router, "/submissions?status=pending&submission_type=waste").await;
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 1);

    let (status, body) = get(&router, "/submissions?status=resolved").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1000);

    let (_, _) = post_json(
        &router,
        "/moderator/approve",
        json!({"moderator_id": moderator.id, "submission_id": submission_id,
               "decision": "approved"}),
    )
    .await;
    let (_, body) = get(&router, "/submissions").await;
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn submission_detail_round_trip() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let router = routes::router(ctx.state);

    let (status, body) = get(&router, "/submissions/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1003);

    let (_, body) = post_json(&router, "/submissions", submission_body(alice.id, "img9")).await;
    let submission_id = body["resp_data"]["submission"]["id"].as_i64().unwrap();

    let (status, body) = get(&router, &format!("/submissions/{submission_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["image_url"], "img9");
    assert_eq!(body["resp_data"]["status"], "pending");
}

#[tokio::test]
async fn approving_an_unknown_submission_404s() {
    let ctx = test_context();
    let moderator = seed_user(&ctx.store, "mod", Role::Moderator).await;
    let router = routes::router(ctx.state);

    let (status, body) = post_json(
        &router,
        "/moderator/approve",
        json!({"moderator_id": moderator.id, "submission_id": 77, "decision": "approved"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn moderator_queue_requires_submission_type() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let router = routes::router(ctx.state);

    post_json(&router, "/submissions", submission_body(alice.id, "img1")).await;

    let (status, _) = get(&router, "/moderator/submissions").await;
    assert!(status.is_client_error());

    let (status, body) = get(&router, "/moderator/submissions?submission_type=waste").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 1);

    let (_, body) = get(&router, "/moderator/submissions?submission_type=tree").await;
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn repeated_approval_is_a_conflict_over_http() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let moderator = seed_user(&ctx.store, "mod", Role::Moderator).await;
    let router = routes::router(ctx.state);

    let (_, body) = post_json(&router, "/submissions", submission_body(alice.id, "img1")).await;
    let submission_id = body["resp_data"]["submission"]["id"].as_i64().unwrap();

    let approve = json!({"moderator_id": moderator.id, "submission_id": submission_id,
                         "decision": "approved"});
    let (status, _) = post_json(&router, "/moderator/approve", approve.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&router, "/moderator/approve", approve).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 1005);
}

#[tokio::test]
async fn resolve_and_audit_log_round_trip() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let moderator = seed_user(&ctx.store, "mod", Role::Moderator).await;
    let store = ctx.store.clone();
    let router = routes::router(ctx.state);

    let (_, body) = post_json(&router, "/submissions", submission_body(alice.id, "img1")).await;
    let submission_id = body["resp_data"]["submission"]["id"].as_i64().unwrap();

    let (status, body) = post_json(
        &router,
        &format!(
            "/moderator/resolve?submission_id={submission_id}&moderator_id={}",
            moderator.id
        ),
        Value::Null,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["resp_data"]["message"],
        "Submission resolved; moderator awarded 50 points."
    );
    assert_eq!(
        store
            .find_user(moderator.id)
            .await
            .unwrap()
            .unwrap()
            .points,
        50
    );

    let (_, body) = post_json(
        &router,
        "/moderator/approve",
        json!({"moderator_id": moderator.id, "submission_id": submission_id,
               "decision": "rejected", "remarks": "already handled"}),
    )
    .await;
    // Resolved submissions are no longer pending, so the decision is refused.
    assert_eq!(body["code"], 1005);

    let (status, body) = get(&router, "/moderator/approvals").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn leaderboard_orders_users_by_points() {
    let ctx = test_context();
    let alice = seed_user(&ctx.store, "alice", Role::User).await;
    let bob = seed_user(&ctx.store, "bob", Role::User).await;
    let store = ctx.store.clone();
    let router = routes::router(ctx.state);

    store.update_user_points(alice.id, 30).await.unwrap();
    store.update_user_points(bob.id, 120).await.unwrap();

    let (status, body) = get(&router, "/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["resp_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["bob", "alice"]);

    // The unordered listing still returns everyone.
    let (status, body) = get(&router, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 2);
}
