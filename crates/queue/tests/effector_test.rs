//! `ApiDecisionEffector` against an in-process fake backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_client::ApiClient;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use profile_data::{DecisionKind, Tab};
use queue::{ApiDecisionEffector, DecisionEffector, EffectorError, SubmitRequest};
use serde_json::{Value, json};
use tokio::net::TcpListener;

type Seen = Arc<Mutex<Vec<String>>>;

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

fn backend(seen: Seen) -> Router {
    Router::new()
        .route(
            "/api/profiles/{id}/like",
            post(
                |State(seen): State<Seen>, Path(id): Path<u64>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(format!("like {} by {}", id, body["user_id"]));
                    Json(json!({"matched": id == 2}))
                },
            ),
        )
        .route(
            "/api/profiles/{id}/pass",
            post(|State(seen): State<Seen>, Path(id): Path<u64>| async move {
                seen.lock().unwrap().push(format!("pass {}", id));
                Json(json!({}))
            }),
        )
        .route(
            "/api/likes/respond",
            post(
                |State(seen): State<Seen>,
                 Query(params): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(format!(
                        "respond {} to {} by {}",
                        body["action"].as_str().unwrap_or_default(),
                        body["targetUserId"],
                        params.get("user_id").cloned().unwrap_or_default()
                    ));
                    Json(json!({"status": "ok"}))
                },
            ),
        )
        .with_state(seen)
}

fn request(tab: Tab, candidate_id: u64, target_user_id: u64, kind: DecisionKind) -> SubmitRequest {
    SubmitRequest {
        tab,
        candidate_id,
        target_user_id,
        kind,
    }
}

async fn effector(seen: &Seen) -> ApiDecisionEffector {
    let base = spawn_backend(backend(Arc::clone(seen))).await;
    let client = ApiClient::new(&base, Duration::from_secs(2)).expect("Failed to build client");
    ApiDecisionEffector::new(client, 42)
}

#[tokio::test]
async fn test_discover_decisions_use_like_and_pass() {
    let seen = Seen::default();
    let effector = effector(&seen).await;

    let mutual = effector
        .submit_decision(&request(Tab::Discover, 2, 2, DecisionKind::Like))
        .await
        .unwrap();
    let one_sided = effector
        .submit_decision(&request(Tab::Discover, 3, 3, DecisionKind::Like))
        .await
        .unwrap();
    let passed = effector
        .submit_decision(&request(Tab::Discover, 4, 4, DecisionKind::Pass))
        .await
        .unwrap();

    assert!(mutual.matched);
    assert!(!one_sided.matched);
    assert!(!passed.matched);
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["like 2 by 42", "like 3 by 42", "pass 4"]
    );
}

#[tokio::test]
async fn test_incoming_likes_respond_to_owner() {
    let seen = Seen::default();
    let effector = effector(&seen).await;

    let accepted = effector
        .submit_decision(&request(Tab::IncomingLikes, 10, 77, DecisionKind::Like))
        .await
        .unwrap();
    let declined = effector
        .submit_decision(&request(Tab::IncomingLikes, 11, 78, DecisionKind::Pass))
        .await
        .unwrap();

    assert!(accepted.matched);
    assert!(!declined.matched);
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["respond accept to 77 by 42", "respond decline to 78 by 42"]
    );
}

#[tokio::test]
async fn test_backend_error_surfaces_as_effector_error() {
    let router = Router::new().route(
        "/api/profiles/{id}/like",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "database unavailable"})),
            )
        }),
    );
    let base = spawn_backend(router).await;
    let client = ApiClient::new(&base, Duration::from_secs(2)).unwrap();
    let effector = ApiDecisionEffector::new(client, 42);

    let err = effector
        .submit_decision(&request(Tab::Discover, 1, 1, DecisionKind::Like))
        .await
        .unwrap_err();

    assert!(matches!(err, EffectorError::Api(_)));
    assert!(err.to_string().contains("database unavailable"));
}
