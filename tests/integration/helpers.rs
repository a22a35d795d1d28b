//! Shared test helpers for integration tests.
//!
//! Each test serves its own fake administration API on an ephemeral port
//! and points a real [`ApiServices`] at it.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;

use memberhub_client::{ApiServices, HttpService};
use memberhub_core::config::api::ApiConfig;

/// Bearer token every test client sends.
pub const TEST_TOKEN: &str = "test-token";

/// One request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request path.
    pub path: String,
    /// `Authorization` header, if any.
    pub authorization: Option<String>,
    /// JSON body, or a summary built by the handler.
    pub body: Value,
}

/// Collects requests reaching the fake backend.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    /// Record a request.
    pub fn record(&self, path: &str, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Recorded {
            path: path.to_string(),
            authorization,
            body,
        });
    }

    /// Every request so far, oldest first.
    pub fn all(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests so far.
    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The latest request.
    pub fn last(&self) -> Option<Recorded> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Wait until at least `n` requests arrived.
    pub async fn wait_for_count(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.count() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("backend never received the expected requests");
    }
}

/// Test application context
pub struct TestApp {
    /// Base URL of the fake API, including the `/api` prefix.
    pub base_url: String,
    /// Services pointed at the fake API.
    pub api: ApiServices,
    /// Requests received by the fake API.
    pub recorder: Recorder,
}

impl TestApp {
    /// Serve the router built by `routes` and connect a client to it.
    pub async fn spawn<F>(routes: F) -> Self
    where
        F: FnOnce(Recorder) -> Router,
    {
        let recorder = Recorder::default();
        let router = routes(recorder.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("fake API crashed");
        });

        let base_url = format!("http://{addr}/api");
        let api = ApiServices::new(http_service(&base_url));
        Self {
            base_url,
            api,
            recorder,
        }
    }
}

/// An HTTP service for `base_url` carrying [`TEST_TOKEN`].
pub fn http_service(base_url: &str) -> HttpService {
    HttpService::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        auth_token: Some(TEST_TOKEN.to_string()),
        ..ApiConfig::default()
    })
    .expect("Failed to build HTTP service")
}

/// A member as the API lists it.
pub fn member_json(code: &str, first_name: &str, status: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "memberCode": code,
        "firstName": first_name,
        "lastName": "Nair",
        "dateOfBirth": "1980-04-12",
        "gender": "female",
        "phone": "+919800000001",
        "agentId": Uuid::new_v4(),
        "unitId": Uuid::new_v4(),
        "status": status,
        "registeredAt": "2024-01-15T09:30:00Z",
    })
}

/// A flat search envelope.
pub fn flat_page(items: Vec<Value>, total: u64, page: u32, page_size: u32) -> Value {
    json!({
        "items": items,
        "total": total,
        "page": page,
        "pageSize": page_size,
    })
}

/// A nested search envelope.
pub fn nested_page(items: Vec<Value>, total: u64, page: u32, page_size: u32) -> Value {
    json!({
        "items": items,
        "pagination": {
            "page": page,
            "pageSize": page_size,
            "totalItems": total,
            "totalPages": total.div_ceil(u64::from(page_size)),
        },
    })
}
