//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

use vyos_config::patch::Operation;
use vyos_config::remote::{RemoteError, RemoteSession, EMPTY_TREE_SENTINEL};
use vyos_config::tree::{ConfigPath, ConfigValue};

/// In-memory device: applies operations to a tree and counts calls.
pub struct InMemorySession {
    tree: Mutex<ConfigValue>,
    fetch_delay: Duration,
    pub fetches: AtomicUsize,
    pub saves: AtomicUsize,
    pub batches: Mutex<Vec<Vec<Operation>>>,
}

#[allow(dead_code)]
impl InMemorySession {
    pub fn new(tree: Value) -> Arc<Self> {
        Self::with_fetch_delay(tree, Duration::ZERO)
    }

    pub fn with_fetch_delay(tree: Value, fetch_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            tree: Mutex::new(ConfigValue::from(tree)),
            fetch_delay,
            fetches: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn tree(&self) -> ConfigValue {
        self.tree.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<Vec<Operation>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteSession for InMemorySession {
    async fn fetch_tree(&self) -> Result<ConfigValue, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }

        let tree = self.tree();
        if tree.is_presence_flag() {
            return Err(RemoteError::Api(format!(
                "Configuration under specified path is empty: {}",
                EMPTY_TREE_SENTINEL
            )));
        }
        Ok(tree)
    }

    async fn set(&self, path: &ConfigPath, value: &ConfigValue) -> Result<(), RemoteError> {
        let mut tree = self.tree.lock().unwrap();
        set_at(&mut tree, path.segments(), value)
    }

    async fn delete(&self, path: &ConfigPath) -> Result<(), RemoteError> {
        let mut tree = self.tree.lock().unwrap();
        remove_at(&mut tree, path.segments())
    }

    async fn submit_batch(&self, ops: &[Operation]) -> Result<(), RemoteError> {
        let mut tree = self.tree.lock().unwrap();

        // Apply to a copy so a failing operation leaves the device untouched.
        let mut staged = tree.clone();
        for op in ops {
            match op {
                Operation::Set { path, value } => set_at(&mut staged, path.segments(), value)?,
                Operation::Delete { path } => remove_at(&mut staged, path.segments())?,
            }
        }
        *tree = staged;
        self.batches.lock().unwrap().push(ops.to_vec());
        Ok(())
    }

    async fn save(&self) -> Result<(), RemoteError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn save_to_file(&self, _file: &str) -> Result<(), RemoteError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn set_at(
    node: &mut ConfigValue,
    segments: &[String],
    value: &ConfigValue,
) -> Result<(), RemoteError> {
    let Some((head, rest)) = segments.split_first() else {
        return Err(RemoteError::Api("Cannot set the configuration root".into()));
    };
    let ConfigValue::Object(map) = node else {
        return Err(RemoteError::Api(format!("Cannot set below leaf node '{}'", head)));
    };

    if rest.is_empty() {
        if value.is_presence_flag() {
            map.entry(head.clone()).or_insert_with(ConfigValue::presence_flag);
        } else {
            map.insert(head.clone(), value.clone());
        }
        return Ok(());
    }

    let child = map.entry(head.clone()).or_insert_with(ConfigValue::presence_flag);
    set_at(child, rest, value)
}

fn remove_at(node: &mut ConfigValue, segments: &[String]) -> Result<(), RemoteError> {
    let missing = || RemoteError::Api("Nothing to delete".into());

    let (head, rest) = segments.split_first().ok_or_else(missing)?;
    let ConfigValue::Object(map) = node else {
        return Err(missing());
    };

    if rest.is_empty() {
        return map.remove(head).map(|_| ()).ok_or_else(missing);
    }
    let child = map.get_mut(head).ok_or_else(missing)?;
    remove_at(child, rest)
}

/// One request received by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub key: String,
    pub data: Value,
}

type Responder = Arc<dyn Fn(&str, &Value) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    responder: Responder,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn handle(
    State(state): State<MockState>,
    Path(endpoint): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let data = form
        .get("data")
        .and_then(|d| serde_json::from_str(d).ok())
        .unwrap_or(Value::Null);
    let key = form.get("key").cloned().unwrap_or_default();

    let (status, body) = (state.responder)(&endpoint, &data);
    state.requests.lock().unwrap().push(RecordedRequest { endpoint, key, data });

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// Start a mock device API on an ephemeral port.
///
/// Returns the base URL and the log of received requests.
#[allow(dead_code)]
pub async fn start_mock_api<F>(responder: F) -> (String, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(&str, &Value) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        responder: Arc::new(responder),
        requests: requests.clone(),
    };
    let app = Router::new().route("/{endpoint}", post(handle)).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), requests)
}

/// Successful API envelope around `data`.
#[allow(dead_code)]
pub fn ok_envelope(data: Value) -> (u16, String) {
    (200, serde_json::json!({"success": true, "data": data, "error": null}).to_string())
}

/// Failed API envelope with `error`.
#[allow(dead_code)]
pub fn error_envelope(status: u16, error: &str) -> (u16, String) {
    (status, serde_json::json!({"success": false, "data": null, "error": error}).to_string())
}
