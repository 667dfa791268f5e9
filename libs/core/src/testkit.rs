use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::errors::TransportError;
use crate::transport::Transport;

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Loads a JSON fixture relative to `tests/fixtures` of this crate.
pub fn load_fixture(path: impl AsRef<Path>) -> Value {
    let full = fixtures_root().join(path.as_ref());
    let content = fs::read_to_string(&full)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", full.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|err| panic!("invalid json in {}: {err}", full.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub token: String,
    /// `Null` for GET requests.
    pub body: Value,
}

/// In-memory [`Transport`] that records every request and replays scripted
/// outcomes in order. With nothing scripted it answers like a successful send.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    outcomes: Mutex<VecDeque<Result<Value, TransportError>>>,
}

impl RecordingTransport {
    pub fn respond_next(&self, body: Value) {
        lock(&self.outcomes).push_back(Ok(body));
    }

    pub fn fail_next(&self, err: TransportError) {
        lock(&self.outcomes).push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_body(&self) -> Option<Value> {
        lock(&self.requests).last().map(|req| req.body.clone())
    }

    fn record(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Value,
    ) -> Result<Value, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method,
            url: url.to_string(),
            token: token.to_string(),
            body,
        });
        lock(&self.outcomes)
            .pop_front()
            .unwrap_or_else(|| Ok(default_response()))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &Value,
    ) -> Result<Value, TransportError> {
        self.record(Method::Post, url, token, body.clone())
    }

    async fn get_json(&self, url: &str, token: &str) -> Result<Value, TransportError> {
        self.record(Method::Get, url, token, Value::Null)
    }
}

fn default_response() -> Value {
    json!({
        "messaging_product": "whatsapp",
        "messages": [{"id": "wamid.test"}]
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
