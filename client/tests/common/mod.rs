//! In-process stand-in for the marketplace backend.
//!
//! A single fallback handler matches on method and path, records every
//! request it sees, and answers with canned JSON.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use market_client::config::ClientConfig;
use market_client::services::http::RetryConfig;

pub const VALID_TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "secret1";
pub const DOWNLOAD_SIZE: usize = 10_000;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Backend {
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    pub flaky_calls: Arc<AtomicU32>,
    pub failing_post_calls: Arc<AtomicU32>,
}

impl Backend {
    pub fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.recorded().pop().expect("no request recorded")
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.recorded()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub backend: Backend,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client config pointed at this server, with fast retries.
    pub fn config(&self, session_file: std::path::PathBuf) -> ClientConfig {
        ClientConfig {
            api_base_url: self.base_url(),
            timeout: Duration::from_secs(2),
            session_file,
            retry: RetryConfig::default().with_retry_delay(Duration::from_millis(10)),
            batch_concurrency: 3,
        }
    }
}

pub async fn start_server() -> TestServer {
    let backend = Backend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        addr,
        backend,
        _handle: handle,
    }
}

fn user_json(username: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "nickname": null,
        "email": "alice@campus.edu",
        "role": "admin",
        "created_at": "2024-03-01T08:00:00Z"
    })
}

fn request_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "求购二手自行车",
        "description": "九成新即可",
        "priceRange": {"min": 100.0, "max": 300.0},
        "categoryId": "5",
        "status": "active",
        "viewCount": 12,
        "seller_note": "kept in extra"
    })
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn handle(State(backend): State<Backend>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let json_body: Option<Value> = serde_json::from_slice(&body).ok();

    backend.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: authorization.clone(),
        body: json_body.clone(),
    });

    let expected = format!("Bearer {}", VALID_TOKEN);
    let authorized = authorization.as_deref() == Some(expected.as_str());

    match (method.as_str(), path.as_str()) {
        ("POST", "/api/auth/login") | ("POST", "/api/user/login") => {
            let body = json_body.unwrap_or(Value::Null);
            let name = body
                .get("username")
                .or_else(|| body.get("email"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            if body.get("password").and_then(Value::as_str) == Some(PASSWORD) {
                reply(StatusCode::OK, json!({"token": VALID_TOKEN, "user": user_json(&name)}))
            } else {
                reply(StatusCode::UNAUTHORIZED, json!({"message": "用户名或密码错误"}))
            }
        }
        ("POST", "/api/auth/logout") => reply(StatusCode::OK, json!({"message": "已退出"})),
        ("POST", "/api/auth/register") | ("POST", "/api/user/register") => {
            reply(StatusCode::CREATED, json!({"message": "注册成功"}))
        }
        ("GET", "/api/users/me") | ("PUT", "/api/users/me") => {
            if authorized {
                reply(StatusCode::OK, user_json("alice"))
            } else {
                reply(StatusCode::UNAUTHORIZED, json!({"message": "登录已过期"}))
            }
        }
        ("POST", "/api/auth/refresh-token") => {
            reply(StatusCode::OK, json!({"token": "tok-456", "refreshToken": "r-2"}))
        }
        ("GET", "/api/requests")
        | ("GET", "/api/requests/search")
        | ("GET", "/api/requests/my")
        | ("GET", "/api/requests/favorites") => reply(
            StatusCode::OK,
            json!({"list": [request_json("1"), request_json("2")], "total": 2, "page": 1, "pageSize": 20}),
        ),
        ("POST", "/api/requests") => reply(StatusCode::CREATED, request_json("99")),
        ("GET", "/api/flaky") => {
            let n = backend.flaky_calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                reply(StatusCode::SERVICE_UNAVAILABLE, json!({"message": "维护中"}))
            } else {
                reply(StatusCode::OK, json!({"message": "recovered"}))
            }
        }
        ("POST", "/api/flaky") => {
            backend.failing_post_calls.fetch_add(1, Ordering::SeqCst);
            reply(StatusCode::SERVICE_UNAVAILABLE, json!({"message": "维护中"}))
        }
        ("GET", "/api/missing") => reply(StatusCode::NOT_FOUND, json!({"error": "not here"})),
        ("GET", "/api/empty") => StatusCode::NO_CONTENT.into_response(),
        ("GET", "/api/slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            reply(StatusCode::OK, json!({"message": "late"}))
        }
        ("GET", "/api/download") => {
            let data: Vec<u8> = (0..DOWNLOAD_SIZE).map(|i| (i % 251) as u8).collect();
            (StatusCode::OK, [(header::CONTENT_TYPE, "application/octet-stream")], data).into_response()
        }
        ("POST", "/api/upload") => reply(StatusCode::OK, json!({"message": format!("received {}", body.len())})),
        ("GET", "/api/ip") => reply(StatusCode::OK, json!({"ip": "203.0.113.7"})),
        ("GET", p) if p.starts_with("/api/requests/") && p.ends_with("/contact") => {
            reply(StatusCode::OK, json!({"phone": "13800138000", "wechat": "bike_fan"}))
        }
        ("GET", p) if p.starts_with("/api/requests/") && p.ends_with("/comments") => reply(
            StatusCode::OK,
            json!({"items": [{"id": 5, "content": "我有一辆", "likeCount": 3}], "total": 1}),
        ),
        ("POST", p) if p.starts_with("/api/requests/") && p.ends_with("/comments") => {
            let content = json_body
                .as_ref()
                .and_then(|b| b.get("content"))
                .cloned()
                .unwrap_or(Value::Null);
            reply(StatusCode::CREATED, json!({"id": 6, "content": content}))
        }
        ("GET", p) | ("PUT", p) if p.starts_with("/api/requests/") => {
            let id = p.trim_start_matches("/api/requests/").to_string();
            reply(StatusCode::OK, request_json(&id))
        }
        (_, p) if p.starts_with("/api/") => reply(StatusCode::OK, json!({"message": "ok"})),
        _ => reply(StatusCode::NOT_FOUND, json!({"message": "no route"})),
    }
}
