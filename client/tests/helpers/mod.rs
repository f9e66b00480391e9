//! Reusable test helpers for integration tests.
//!
//! Provides an in-process mock of the Neswara REST API ([`MockApi`]) served
//! on an ephemeral port by [`spawn_test_server()`], plus token minting and
//! dashboard construction helpers.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use nw_common::{sort_comments, Comment, ContentType, SortOrder};
use nw_dashboard::config::Config;
use nw_dashboard::credential::{Claims, CredentialStore, MemoryStore};
use nw_dashboard::Dashboard;

// ============================================================================
// Mock API state
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub role_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MockRole {
    pub permissions: Vec<String>,
    pub delay: Duration,
}

/// Shared state behind the mock API.
#[derive(Default)]
pub struct MockApi {
    users: Mutex<Vec<MockUser>>,
    roles: Mutex<HashMap<i64, MockRole>>,
    tokens: Mutex<HashMap<String, i64>>,
    /// Role ids handed out by `/user/user-info` before falling back to the
    /// user's own role.
    user_info_roles: Mutex<VecDeque<i64>>,
    comments: Mutex<Vec<Comment>>,
    requests: Mutex<Vec<String>>,
    /// Every authenticated endpoint answers `401`.
    pub reject_sessions: AtomicBool,
    /// `/roles/role` answers `500`.
    pub fail_roles: AtomicBool,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_role(&self, role_id: i64, permissions: &[&str]) {
        self.add_slow_role(role_id, permissions, Duration::ZERO);
    }

    pub fn add_slow_role(&self, role_id: i64, permissions: &[&str], delay: Duration) {
        self.roles.lock().unwrap().insert(
            role_id,
            MockRole {
                permissions: permissions.iter().map(ToString::to_string).collect(),
                delay,
            },
        );
    }

    pub fn add_user(&self, id: i64, email: &str, password: &str, role_id: i64) {
        self.users.lock().unwrap().push(MockUser {
            id,
            email: email.to_string(),
            password: password.to_string(),
            role_id,
        });
    }

    pub fn set_user_role(&self, user_id: i64, role_id: i64) {
        if let Some(user) = self
            .users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|u| u.id == user_id)
        {
            user.role_id = role_id;
        }
    }

    pub fn queue_user_info_roles(&self, roles: &[i64]) {
        self.user_info_roles.lock().unwrap().extend(roles);
    }

    /// Mint a token for `user_id` expiring `expires_in_secs` from now
    /// (negative for already expired) and register it.
    pub fn issue_token(&self, user_id: i64, expires_in_secs: i64) -> String {
        let user = self.user(user_id).expect("unknown mock user");
        let token = mint_token(&user, expires_in_secs);
        self.tokens.lock().unwrap().insert(token.clone(), user_id);
        token
    }

    pub fn seed_comment(
        &self,
        id: i64,
        content_id: i64,
        parent_id: Option<i64>,
        author_id: i64,
        created_secs: i64,
    ) {
        self.comments.lock().unwrap().push(Comment {
            id,
            content_id,
            content_type: ContentType::News,
            author_id,
            author_email: format!("user{author_id}@example.com"),
            author_photo: None,
            parent_id,
            body: format!("comment {id}"),
            created_at: Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap(),
            updated_at: None,
        });
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.lock().unwrap().clone()
    }

    /// Requests seen so far as `METHOD /path`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.split(' ').nth(1).is_some_and(|p| p.starts_with(prefix)))
            .count()
    }

    fn user(&self, user_id: i64) -> Option<MockUser> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }

    fn log(&self, method: &str, path: &str) {
        self.requests
            .lock()
            .unwrap()
            .push(format!("{method} {path}"));
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<MockUser, Response> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let user = token
            .filter(|_| !self.reject_sessions.load(Ordering::SeqCst))
            .and_then(|t| self.tokens.lock().unwrap().get(t).copied())
            .and_then(|id| self.user(id));
        user.ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Invalid Token"))
    }

    fn role_permissions(&self, role_id: i64) -> Vec<String> {
        self.roles
            .lock()
            .unwrap()
            .get(&role_id)
            .map(|r| r.permissions.clone())
            .unwrap_or_default()
    }
}

pub fn mint_token(user: &MockUser, expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id: user.id,
        name: Some(format!("User {}", user.id)),
        email: Some(user.email.clone()),
        photo: None,
        role_id: user.role_id,
        iat: Some(now),
        exp: now + expires_in_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"mock-server-secret"),
    )
    .expect("Failed to mint token")
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(api): State<Arc<MockApi>>, Json(body): Json<LoginBody>) -> Response {
    api.log("POST", "/user/login");
    let user = api
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.email == body.email && u.password == body.password)
        .cloned();
    match user {
        Some(user) => {
            let token = api.issue_token(user.id, 3600);
            Json(json!({ "message": "Login successful", "token": token })).into_response()
        }
        None => error(StatusCode::BAD_REQUEST, "Invalid email or password"),
    }
}

async fn user_info(State(api): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    api.log("GET", "/user/user-info");
    let user = match api.authenticate(&headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let role_id = api
        .user_info_roles
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or(user.role_id);
    Json(json!({
        "user": {
            "id": user.id,
            "role_id": role_id,
            "email": user.email,
            "name": format!("User {}", user.id),
        }
    }))
    .into_response()
}

async fn role(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    api.log("GET", "/roles/role");
    if let Err(resp) = api.authenticate(&headers) {
        return resp;
    }
    if api.fail_roles.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "");
    }
    let Some(role_id) = query.get("id").and_then(|v| v.parse::<i64>().ok()) else {
        return error(StatusCode::BAD_REQUEST, "Role id is required");
    };
    let role = api.roles.lock().unwrap().get(&role_id).cloned();
    let Some(role) = role else {
        return error(StatusCode::NOT_FOUND, "Role not found");
    };
    tokio::time::sleep(role.delay).await;
    Json(json!({
        "message": "Role fetched",
        "data": {
            "id": role_id,
            "name": format!("role-{role_id}"),
            "permission": role.permissions,
        }
    }))
    .into_response()
}

async fn list_comments(
    State(api): State<Arc<MockApi>>,
    Path((kind, content_id)): Path<(String, i64)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    api.log("GET", &format!("/comments/{kind}/{content_id}"));
    let order: SortOrder = query
        .get("order")
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(5);
    let parent_id: Option<i64> = query.get("parent_id").and_then(|v| v.parse().ok());

    let mut matching: Vec<Comment> = api
        .comments()
        .into_iter()
        .filter(|c| c.content_id == content_id && c.parent_id == parent_id)
        .collect();
    sort_comments(&mut matching, order);
    let total = matching.len();
    let data: Vec<Comment> = matching
        .into_iter()
        .skip(page.saturating_sub(1) * limit)
        .take(limit)
        .collect();
    Json(json!({ "message": "Comments fetched", "data": data, "total": total })).into_response()
}

#[derive(Deserialize)]
struct AddCommentBody {
    source_id: i64,
    parent_id: Option<i64>,
    content: String,
}

async fn add_comment(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    Path(kind): Path<String>,
    Json(body): Json<AddCommentBody>,
) -> Response {
    api.log("POST", &format!("/comments/{kind}/add"));
    let user = match api.authenticate(&headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    if !api
        .role_permissions(user.role_id)
        .iter()
        .any(|p| p == "comment-create")
    {
        return error(StatusCode::FORBIDDEN, "Permission denied");
    }
    let Ok(content_type) = kind.parse::<ContentType>() else {
        return error(StatusCode::BAD_REQUEST, "Unknown content type");
    };
    let mut comments = api.comments.lock().unwrap();
    let id = comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    comments.push(Comment {
        id,
        content_id: body.source_id,
        content_type,
        author_id: user.id,
        author_email: user.email,
        author_photo: None,
        parent_id: body.parent_id,
        body: body.content,
        created_at: Utc::now(),
        updated_at: None,
    });
    Json(json!({ "message": "Comment added" })).into_response()
}

#[derive(Deserialize)]
struct EditCommentBody {
    content: String,
}

async fn edit_comment(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, i64)>,
    Json(body): Json<EditCommentBody>,
) -> Response {
    api.log("PUT", &format!("/comments/{kind}/edit/{id}"));
    let user = match api.authenticate(&headers) {
        Ok(user) => user,
        Err(resp) => return resp,
    };
    let mut comments = api.comments.lock().unwrap();
    match comments.iter_mut().find(|c| c.id == id) {
        Some(c) if c.author_id == user.id => {
            c.body = body.content;
            c.updated_at = Some(Utc::now());
            Json(json!({ "message": "Comment updated" })).into_response()
        }
        Some(_) => error(StatusCode::FORBIDDEN, "Not your comment"),
        None => error(StatusCode::NOT_FOUND, "Comment not found"),
    }
}

async fn delete_comment(
    State(api): State<Arc<MockApi>>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, i64)>,
) -> Response {
    api.log("DELETE", &format!("/comments/{kind}/delete/{id}"));
    if let Err(resp) = api.authenticate(&headers) {
        return resp;
    }
    api.comments
        .lock()
        .unwrap()
        .retain(|c| c.id != id && c.parent_id != Some(id));
    Json(json!({ "message": "Comment deleted" })).into_response()
}

async fn list_tags(State(api): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    api.log("GET", "/tags");
    if let Err(resp) = api.authenticate(&headers) {
        return resp;
    }
    Json(json!({
        "message": "Tags fetched",
        "tags": [
            { "id": 1, "name": "Banjir", "slug": "banjir", "color": "#0ea5e9" },
            { "id": 2, "name": "Pemilu", "slug": "pemilu" }
        ],
        "meta": { "currentPage": 1, "itemsPerPage": 5, "totalItems": 2, "totalPages": 1 }
    }))
    .into_response()
}

pub fn router(api: Arc<MockApi>) -> Router {
    Router::new()
        .route("/user/login", post(login))
        .route("/user/admin-login", post(login))
        .route("/user/user-info", get(user_info))
        .route("/roles/role", get(role))
        .route("/comments/{kind}/add", post(add_comment))
        .route("/comments/{kind}/edit/{id}", put(edit_comment))
        .route("/comments/{kind}/delete/{id}", delete(delete_comment))
        .route("/comments/{kind}/{content_id}", get(list_comments))
        .route("/tags", get(list_tags))
        .with_state(api)
}

// ============================================================================
// Test server
// ============================================================================

/// Handle to a running test server.
pub struct TestServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL for API requests (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn the mock API on a random port.
pub async fn spawn_test_server(api: Arc<MockApi>) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router(api))
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

/// Dashboard against `server` with an in-memory credential store.
pub fn dashboard(server: &TestServer, store: Arc<MemoryStore>) -> Dashboard {
    let store: Arc<dyn CredentialStore> = store;
    Dashboard::with_store(Config::default_for_test(&server.url), store)
        .expect("Failed to build dashboard")
}

/// Standard fixture: an editor (user 1, role 3), a reader (user 2, role 6)
/// and the guest role 7.
pub fn seeded_api() -> Arc<MockApi> {
    let api = MockApi::new();
    api.add_role(
        3,
        &[
            "dashboard-access",
            "news-list",
            "news-edit",
            "comment-list",
            "comment-create",
            "comment-edit",
            "comment-delete",
        ],
    );
    api.add_role(6, &["comment-list", "comment-create"]);
    api.add_role(7, &[]);
    api.add_user(1, "editor@neswara.id", "secret", 3);
    api.add_user(2, "reader@neswara.id", "secret", 6);
    api
}

pub fn value_of(body: &str) -> Value {
    serde_json::from_str(body).expect("invalid JSON")
}
