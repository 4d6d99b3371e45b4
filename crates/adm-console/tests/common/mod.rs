//! In-process mock record store for the integration tests.
//!
//! Behaves like the json-server instance the console talks to in development:
//! top-level collections, `?id=` filtering by string form, string ids for
//! created records and `{}` with 404 for unknown ids. Every request is logged
//! so tests can assert on what went over the wire.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use adm_console::{ConsoleConfig, ConsoleState, Notification, Notifier};
use adm_store::StoreClient;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;

/// One request as received by the mock store
#[derive(Debug, Clone)]
pub struct LoggedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

/// Forced failure for every request with a matching method
#[derive(Debug, Clone)]
pub struct Fault {
    pub method: Method,
    pub status: StatusCode,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<LoggedRequest>,
    next_id: u64,
    fault: Option<Fault>,
    serve_html: bool,
    vanish_on_delete: bool,
    stall: Option<Method>,
}

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Inner>>);

impl Shared {
    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.0.lock().expect("mock store lock poisoned");
        f(&mut inner)
    }
}

fn id_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Log the request and return the injected failure, if any.
fn intercept(
    store: &Shared,
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Option<&Bytes>,
) -> Option<Response> {
    let body = body.and_then(|raw| serde_json::from_slice(raw).ok());

    store.with(|inner| {
        inner.requests.push(LoggedRequest {
            method: method.clone(),
            path,
            query,
            body,
            headers,
        });

        if inner.serve_html {
            return Some(Html("<html><body>maintenance</body></html>").into_response());
        }

        inner
            .fault
            .as_ref()
            .filter(|fault| fault.method == method)
            .map(|fault| (fault.status, Json(json!({}))).into_response())
    })
}

/// Never answer requests with the stalled method.
async fn hold_if_stalled(store: &Shared, method: &Method) {
    if store.with(|inner| inner.stall.as_ref() == Some(method)) {
        std::future::pending::<()>().await;
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

async fn list_records(
    State(store): State<Shared>,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    hold_if_stalled(&store, &Method::GET).await;
    let path = format!("/{collection}");
    if let Some(response) = intercept(&store, Method::GET, path, query.clone(), headers, None) {
        return response;
    }

    store.with(|inner| {
        let Some(records) = inner.collections.get(&collection) else {
            return not_found();
        };

        let matching: Vec<Value> = records
            .iter()
            .filter(|record| match query.get("id") {
                Some(id) => id_key(&record["id"]) == *id,
                None => true,
            })
            .cloned()
            .collect();

        Json(Value::Array(matching)).into_response()
    })
}

async fn create_record(
    State(store): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    hold_if_stalled(&store, &Method::POST).await;
    let path = format!("/{collection}");
    if let Some(response) =
        intercept(&store, Method::POST, path, HashMap::new(), headers, Some(&body))
    {
        return response;
    }

    let Ok(Value::Object(mut record)) = serde_json::from_slice::<Value>(&body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({}))).into_response();
    };

    store.with(|inner| {
        if !record.contains_key("id") {
            inner.next_id += 1;
            record.insert("id".to_string(), json!(format!("{:04x}", inner.next_id)));
        }
        let record = Value::Object(record);
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(record.clone());

        (StatusCode::CREATED, Json(record)).into_response()
    })
}

async fn get_record(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/{collection}/{id}");
    if let Some(response) = intercept(&store, Method::GET, path, HashMap::new(), headers, None) {
        return response;
    }

    store.with(|inner| {
        inner
            .collections
            .get(&collection)
            .and_then(|records| records.iter().find(|r| id_key(&r["id"]) == id))
            .map(|record| Json(record.clone()).into_response())
            .unwrap_or_else(not_found)
    })
}

async fn replace_record(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    hold_if_stalled(&store, &Method::PUT).await;
    let path = format!("/{collection}/{id}");
    if let Some(response) =
        intercept(&store, Method::PUT, path, HashMap::new(), headers, Some(&body))
    {
        return response;
    }

    let Ok(record) = serde_json::from_slice::<Value>(&body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({}))).into_response();
    };

    store.with(|inner| {
        let slot = inner
            .collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| id_key(&r["id"]) == id));

        match slot {
            Some(slot) => {
                *slot = record.clone();
                Json(record).into_response()
            }
            None => not_found(),
        }
    })
}

async fn delete_record(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    hold_if_stalled(&store, &Method::DELETE).await;
    let path = format!("/{collection}/{id}");
    if let Some(response) = intercept(&store, Method::DELETE, path, HashMap::new(), headers, None)
    {
        return response;
    }

    store.with(|inner| {
        let vanish = inner.vanish_on_delete;
        let Some(records) = inner.collections.get_mut(&collection) else {
            return not_found();
        };
        let Some(position) = records.iter().position(|r| id_key(&r["id"]) == id) else {
            return not_found();
        };

        let removed = records.remove(position);
        if vanish {
            // Someone else got there first
            return not_found();
        }
        Json(removed).into_response()
    })
}

/// Running mock store bound to an ephemeral local port
pub struct MockStore {
    addr: SocketAddr,
    shared: Shared,
}

impl MockStore {
    /// Start a store seeded with `document` (`{"users": [...], "products": [...]}`).
    pub async fn start(document: Value) -> Self {
        let shared = Shared::default();
        shared.with(|inner| {
            if let Value::Object(collections) = document {
                for (name, records) in collections {
                    let records = match records {
                        Value::Array(records) => records,
                        _ => Vec::new(),
                    };
                    inner.collections.insert(name, records);
                }
            }
        });

        let app = Router::new()
            .route("/{collection}", get(list_records).post(create_record))
            .route(
                "/{collection}/{id}",
                get(get_record).put(replace_record).delete(delete_record),
            )
            .with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock store");
        let addr = listener.local_addr().expect("Failed to read mock store address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock store crashed");
        });

        Self { addr, shared }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> StoreClient {
        StoreClient::new(&self.base_url(), Duration::from_secs(5), "UTC")
            .expect("Failed to build store client")
    }

    pub fn console(&self) -> (ConsoleState, UnboundedReceiver<Notification>) {
        console_for(&self.base_url())
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.shared
            .with(|inner| inner.collections.get(collection).cloned().unwrap_or_default())
    }

    pub fn requests(&self) -> Vec<LoggedRequest> {
        self.shared.with(|inner| inner.requests.clone())
    }

    /// Logged requests with the given method
    pub fn requests_with(&self, method: Method) -> Vec<LoggedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.shared.with(|inner| inner.requests.clear());
    }

    pub fn fail(&self, method: Method, status: StatusCode) {
        self.shared
            .with(|inner| inner.fault = Some(Fault { method, status }));
    }

    pub fn heal(&self) {
        self.shared.with(|inner| inner.fault = None);
    }

    pub fn serve_html(&self, enabled: bool) {
        self.shared.with(|inner| inner.serve_html = enabled);
    }

    /// Leave every request with this method unanswered; `None` lifts it.
    pub fn stall(&self, method: Option<Method>) {
        self.shared.with(|inner| inner.stall = method);
    }

    /// Make DELETE remove the record but answer 404, as if it had been
    /// deleted concurrently after the lookup.
    pub fn vanish_on_delete(&self, enabled: bool) {
        self.shared.with(|inner| inner.vanish_on_delete = enabled);
    }
}

/// Console wired to an arbitrary base URL, with its notification receiver.
pub fn console_for(base_url: &str) -> (ConsoleState, UnboundedReceiver<Notification>) {
    let config = ConsoleConfig {
        api_base: base_url.to_string(),
        request_timeout_secs: 5,
        ..ConsoleConfig::default()
    };
    let (notifier, rx) = Notifier::channel();
    let state = ConsoleState::new(config, notifier).expect("Failed to build console state");
    (state, rx)
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Failed to read throwaway address");
    drop(listener);
    format!("http://{addr}")
}

/// Every notification sent so far.
pub fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut notifications = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        notifications.push(notification);
    }
    notifications
}

pub fn seed() -> Value {
    json!({
        "users": [
            {"id": 1, "name": "Ann", "email": "a@x.com", "gender": "Female", "category": "Student",
             "createdAt": "2025-08-01T12:00:00.000Z", "nickname": "annie"},
            {"id": 2, "name": "Bob", "email": "bob@x.com", "gender": "Male", "category": "Employee",
             "createdAt": "2025-08-01T12:01:00.000Z"}
        ],
        "products": [
            {
                "id": 10, "name": "Desk Lamp", "price": 25.0,
                "description": "Adjustable LED desk lamp", "category": "Home & Garden",
                "quantity": 10, "createdAt": "2025-08-02T12:00:00.000Z",
                "sales": [{"id": "s1", "userId": 1, "quantity": 4, "date": "2025-08-03"}],
                "traffic": [{"date": "2025-08-03", "organic": 40, "referral": 5, "paid": 2}]
            },
            {
                "id": 11, "name": "Rust Book", "price": 40.0,
                "description": "A book about systems programming", "category": "Books",
                "quantity": 3, "createdAt": "2025-08-02T12:01:00.000Z",
                "sales": [], "traffic": []
            }
        ]
    })
}
