//! Integration tests against an in-process fake backend.
//!
//! Each test binds an ephemeral port, serves a small axum router that
//! mimics the real endpoints, and points an `ApiClient` at it.

use std::collections::HashMap;
use std::time::Duration;

use api_client::{ApiClient, ApiClientError};
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use profile_data::{CandidateFilter, DecisionKind};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Fake backend crashed");
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(2)).expect("Failed to build client")
}

async fn echo_profiles(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    // Echo the query back through the profile fields so the test can see it.
    Json(json!({
        "content": [{
            "id": 1,
            "user_id": 100,
            "name": params.get("user_id").cloned().unwrap_or_default(),
            "city": params.get("city").cloned().unwrap_or_default(),
            "university": params.get("page").cloned().unwrap_or_default(),
            "bio": params.get("size").cloned().unwrap_or_default(),
            "interests": params.get("interests").cloned().unwrap_or_default(),
            "photo_url": "p1.jpg"
        }],
        "total_elements": 1,
        "total_pages": 1,
        "size": 50,
        "number": 0
    }))
}

async fn like(Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
    let matched = id == 2 && body["user_id"] == json!(42);
    let match_id = if matched { json!(9) } else { Value::Null };
    Json(json!({"matched": matched, "match_id": match_id, "message": "ok"}))
}

#[tokio::test]
async fn test_fetch_profiles_sends_filter_as_query() {
    let base = spawn_backend(Router::new().route("/api/profiles", get(echo_profiles))).await;

    let filter = CandidateFilter::new()
        .with_city("Moscow")
        .with_interest("Sport")
        .with_interest("IT");
    let candidates = client(&base)
        .fetch_profiles(42, &filter, 3, 25)
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    let candidate = &candidates[0];
    assert_eq!(candidate.name, "42");
    assert_eq!(candidate.city, "Moscow");
    assert_eq!(candidate.university, "3");
    assert_eq!(candidate.bio, "25");
    assert!(candidate.interests.contains("IT"));
    assert!(candidate.interests.contains("Sport"));
    assert_eq!(
        candidate.photo_url.as_deref(),
        Some(format!("{}/uploads/photos/p1.jpg", base).as_str())
    );
}

#[tokio::test]
async fn test_like_reports_match_flag() {
    let base = spawn_backend(Router::new().route("/api/profiles/{id}/like", post(like))).await;
    let api = client(&base);

    let matched = api.like(42, 2).await.unwrap();
    assert!(matched.matched);
    assert_eq!(matched.match_id, Some(9));

    let not_matched = api.like(42, 3).await.unwrap();
    assert!(!not_matched.matched);
}

#[tokio::test]
async fn test_pass_and_respond_accept_empty_bodies() {
    let router = Router::new()
        .route(
            "/api/profiles/{id}/pass",
            post(|| async { Json(json!({"message": "skipped"})) }),
        )
        .route(
            "/api/likes/respond",
            post(
                |Query(params): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                    if params.get("user_id").map(String::as_str) == Some("42")
                        && body["targetUserId"] == json!(7)
                        && body["action"] == json!("decline")
                    {
                        (StatusCode::OK, Json(json!({})))
                    } else {
                        (StatusCode::BAD_REQUEST, Json(json!({"detail": "bad respond body"})))
                    }
                },
            ),
        );
    let base = spawn_backend(router).await;
    let api = client(&base);

    api.pass(42, 5).await.unwrap();
    api.respond_to_like(42, 7, DecisionKind::Pass).await.unwrap();
}

#[tokio::test]
async fn test_error_status_carries_backend_detail() {
    let router = Router::new().route(
        "/api/profiles/{id}/like",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "profile not found"})),
            )
        }),
    );
    let base = spawn_backend(router).await;

    let err = client(&base).like(42, 1).await.unwrap_err();
    match err {
        ApiClientError::Status { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "profile not found");
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_bearer_token_is_forwarded() {
    let router = Router::new().route(
        "/api/profiles/incoming-likes",
        get(|headers: HeaderMap| async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer secret");
            if authorized {
                (StatusCode::OK, Json(json!([{"id": 5, "userId": 55}])))
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({"message": "no token"})))
            }
        }),
    );
    let base = spawn_backend(router).await;

    let api = client(&base).with_token(Some("secret".to_string()));
    let incoming = api.fetch_incoming_likes(42, 0, 20).await.unwrap();

    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].user_id, 55);
}

#[tokio::test]
async fn test_matches_normalizes_variants() {
    let router = Router::new().route(
        "/api/matches",
        get(|| async {
            Json(json!([
                {"id": 1, "matched_profile": {"id": 10, "name": "Anna"}, "matched_at": "2024-05-01T10:00:00"},
                {"id": 2, "matchedProfile": {"id": 11, "name": "Ivan"}}
            ]))
        }),
    );
    let base = spawn_backend(router).await;

    let matches = client(&base).matches(42).await.unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].profile.name, "Anna");
    assert_eq!(matches[1].profile.id, 11);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .pass(1, 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiClientError::Transport { .. } | ApiClientError::Timeout { .. }
    ));
}
