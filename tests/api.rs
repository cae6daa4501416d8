use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use prayertrack::db::{init_db, UserRepository};
use prayertrack::server::{router, AppState, SessionStore};

struct TestApp {
    app: Router,
    users: UserRepository,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl TestApp {
    async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        let state = AppState::new(pool, SessionStore::new(60));

        Self {
            users: state.users.clone(),
            app: router(state),
            _temp_dir: temp_dir,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, token, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Registers a user and returns `(user_id, token)`.
    async fn register(&self, username: &str) -> (i64, String) {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/register",
                None,
                Some(json!({ "username": username, "password": "pw" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        (
            body["user"]["id"].as_i64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    async fn create(&self, token: &str, name: &str, category: &str) -> Value {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/api/prayers",
                Some(token),
                Some(json!({ "name": name, "category": category })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    async fn list(&self, token: &str) -> Vec<Value> {
        let (status, body) = self
            .send_json(Method::GET, "/api/prayers", Some(token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().unwrap().clone()
    }
}

#[tokio::test]
async fn test_health_needs_no_auth() {
    let app = TestApp::new().await;

    let (status, body) = app.send_json(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_prayer_routes_require_session() {
    let app = TestApp::new().await;

    let requests = [
        (Method::GET, "/api/prayers", None),
        (
            Method::POST,
            "/api/prayers",
            Some(json!({ "name": "X", "category": "brethren" })),
        ),
        (
            Method::PATCH,
            "/api/prayers/1",
            Some(json!({ "isResolved": true })),
        ),
        (Method::DELETE, "/api/prayers/1", None),
    ];

    for (method, uri, body) in requests {
        let (status, bytes) = app.send(method.clone(), uri, None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert!(bytes.is_empty());

        let (status, _) = app.send(method, uri, Some("bogus"), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_session_of_removed_user_is_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;
    let entry = app.create(&token, "Jane", "brethren").await;
    let uri = format!("/api/prayers/{}", entry["id"]);

    assert!(app.users.delete("alice").await.unwrap());

    let requests = [
        (Method::GET, "/api/prayers".to_string(), None),
        (
            Method::POST,
            "/api/prayers".to_string(),
            Some(json!({ "name": "X", "category": "brethren" })),
        ),
        (Method::PATCH, uri.clone(), Some(json!({ "isResolved": true }))),
        (Method::DELETE, uri, None),
    ];

    for (method, uri, body) in requests {
        let (status, bytes) = app.send(method.clone(), &uri, Some(&token), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert!(bytes.is_empty());
    }

    let (status, _) = app
        .send(Method::GET, "/api/user", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_toggle_delete_scenario() {
    let app = TestApp::new().await;
    let (user_id, token) = app.register("alice").await;

    let created = app.create(&token, "Pray for X", "unbelievers").await;
    assert_eq!(created["userId"], user_id);
    assert_eq!(created["isResolved"], false);
    assert_eq!(created["category"], "unbelievers");
    let id = created["id"].as_i64().unwrap();

    let listed = app.list(&token).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id);
    assert_eq!(listed[0]["isResolved"], false);

    let uri = format!("/api/prayers/{}", id);
    let (status, updated) = app
        .send_json(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "isResolved": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isResolved"], true);
    assert_eq!(app.list(&token).await[0]["isResolved"], true);

    let (status, updated) = app
        .send_json(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "isResolved": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isResolved"], false);

    let (status, bytes) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(bytes.is_empty());

    assert!(app.list(&token).await.is_empty());
}

#[tokio::test]
async fn test_create_takes_owner_from_session() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.register("alice").await;
    let (bob_id, bob) = app.register("bob").await;

    let (status, created) = app
        .send_json(
            Method::POST,
            "/api/prayers",
            Some(&alice),
            Some(json!({
                "name": "Neighbor",
                "category": "unbelievers",
                "userId": bob_id,
                "ownerId": bob_id,
                "isResolved": true,
                "id": 999
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["userId"], alice_id);
    assert_eq!(created["isResolved"], false);
    assert_ne!(created["id"], 999);
    assert!(app.list(&bob).await.is_empty());
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;

    let invalid = [
        json!({ "name": "X", "category": "coworkers" }),
        json!({ "name": "X" }),
        json!({ "category": "brethren" }),
        json!({ "name": "   ", "category": "brethren" }),
        json!({ "name": 5, "category": "brethren" }),
    ];

    for body in invalid {
        let (status, response) = app
            .send_json(Method::POST, "/api/prayers", Some(&token), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response["error"], "validation_error");
    }

    assert!(app.list(&token).await.is_empty());
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/prayers")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_requires_boolean() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;
    let id = app.create(&token, "Jane", "brethren").await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/prayers/{}", id);

    for body in [
        json!({ "isResolved": "true" }),
        json!({ "isResolved": 1 }),
        json!({}),
    ] {
        let (status, response) = app
            .send_json(Method::PATCH, &uri, Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "isResolved must be a boolean");
    }

    assert_eq!(app.list(&token).await[0]["isResolved"], false);
}

#[tokio::test]
async fn test_ownership_isolation() {
    let app = TestApp::new().await;
    let (_, alice) = app.register("alice").await;
    let (_, bob) = app.register("bob").await;

    let id = app.create(&alice, "Jane", "brethren").await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/prayers/{}", id);

    let (status, body) = app
        .send_json(
            Method::PATCH,
            &uri,
            Some(&bob),
            Some(json!({ "isResolved": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Prayer entry not found or access denied");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let entries = app.list(&alice).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["isResolved"], false);
    assert!(app.list(&bob).await.is_empty());
}

#[tokio::test]
async fn test_missing_and_foreign_entries_look_the_same() {
    let app = TestApp::new().await;
    let (_, alice) = app.register("alice").await;
    let (_, bob) = app.register("bob").await;

    let id = app.create(&alice, "Jane", "brethren").await["id"]
        .as_i64()
        .unwrap();

    let foreign = app
        .send(Method::DELETE, &format!("/api/prayers/{}", id), Some(&bob), None)
        .await;
    let missing = app
        .send(
            Method::DELETE,
            &format!("/api/prayers/{}", id + 1000),
            Some(&bob),
            None,
        )
        .await;

    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;

    let keep = app.create(&token, "Keep", "brethren").await;
    let id = app.create(&token, "Drop", "brethren").await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/prayers/{}", id);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let after_first = app.list(&token).await;

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.list(&token).await, after_first);
    assert_eq!(after_first, vec![keep]);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;

    let (status, _) = app
        .send(Method::DELETE, "/api/prayers/abc", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PATCH,
            "/api/prayers/abc",
            Some(&token),
            Some(json!({ "isResolved": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_in_creation_order() {
    let app = TestApp::new().await;
    let (_, token) = app.register("alice").await;

    for name in ["Zed", "Amy", "Moe"] {
        app.create(&token, name, "unbelievers").await;
    }

    let names: Vec<String> = app
        .list(&token)
        .await
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Zed", "Amy", "Moe"]);
}

#[tokio::test]
async fn test_register_login_logout() {
    let app = TestApp::new().await;
    let (user_id, first_token) = app.register("alice").await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "alice", "password": "other" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "nobody", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "alice", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_ne!(token, first_token);

    let (status, me) = app
        .send_json(Method::GET, "/api/user", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user_id);
    assert_eq!(me["username"], "alice");
    assert!(me.get("password").is_none());

    let (status, _) = app.send(Method::POST, "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, "/api/prayers", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Other sessions are unaffected
    let (status, _) = app
        .send(Method::GET, "/api/prayers", Some(&first_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_requires_credentials() {
    let app = TestApp::new().await;

    for body in [
        json!({ "username": "", "password": "pw" }),
        json!({ "username": "alice", "password": "" }),
        json!({ "username": "alice" }),
    ] {
        let (status, _) = app
            .send(Method::POST, "/api/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
