//! In-process doubles for the ports, shared by unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::broadcast;

use resumatch_domain::{HttpMethod, HttpRequest, RawResponse};

use crate::ports::{
    Clock, EnvironmentEvent, EnvironmentSignals, KeyValueStore, StorageError, TokenSource,
    Transport, TransportError,
};

/// Answers after a fixed delay.
pub struct DelayedTransport {
    delay: Duration,
    response: RawResponse,
}

impl DelayedTransport {
    pub const fn new(delay: Duration, response: RawResponse) -> Self {
        Self { delay, response }
    }
}

#[async_trait]
impl Transport for DelayedTransport {
    async fn execute(&self, _request: &HttpRequest) -> Result<RawResponse, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

/// Always fails with the same transport error.
pub struct FailingTransport(pub TransportError);

#[async_trait]
impl Transport for FailingTransport {
    async fn execute(&self, _request: &HttpRequest) -> Result<RawResponse, TransportError> {
        Err(self.0.clone())
    }
}

type Reply = Result<RawResponse, TransportError>;

/// Records every request and answers per route.
///
/// Each route holds a queue of replies; the last reply repeats once the
/// queue is down to one. Unrouted requests get the fallback.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    fallback: Option<RawResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            fallback: Some(RawResponse::new(status, body)),
            ..Self::default()
        }
    }

    pub fn on(self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.push(method, path, Ok(RawResponse::new(status, body)));
        self
    }

    pub fn on_error(self, method: HttpMethod, path: &str, error: TransportError) -> Self {
        self.push(method, path, Err(error));
        self
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && path_of(&r.url).ends_with(path))
            .count()
    }
}

fn path_of(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let path = path_of(&request.url);
        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .iter_mut()
            .find(|((method, route), _)| *method == request.method && path.ends_with(route.as_str()))
            .map(|(_, queue)| queue);

        match queue {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Ok(self.fallback.clone().unwrap_or_else(|| {
                RawResponse::new(404, r#"{"success": false, "message": "Route not found"}"#)
            })),
        }
    }
}

/// A fixed bearer token.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// HashMap-backed store with switchable write failures.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    failing_key: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fails only writes to `key`.
    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock().unwrap() = Some(key.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key_fails = self.failing_key.lock().unwrap().as_deref() == Some(key);
        if key_fails || self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".into()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A clock that only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.0.lock().unwrap() += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Environment signals driven by the test.
pub struct ManualSignals {
    sender: broadcast::Sender<EnvironmentEvent>,
    online: AtomicBool,
    prefers_dark: AtomicBool,
}

impl ManualSignals {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            sender,
            online: AtomicBool::new(true),
            prefers_dark: AtomicBool::new(false),
        }
    }

    pub fn prefer_dark(&self, dark: bool) {
        self.prefers_dark.store(dark, Ordering::SeqCst);
    }

    pub fn emit(&self, event: EnvironmentEvent) {
        let _ = self.sender.send(event);
    }
}

impl EnvironmentSignals for ManualSignals {
    fn subscribe(&self) -> broadcast::Receiver<EnvironmentEvent> {
        self.sender.subscribe()
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark.load(Ordering::SeqCst)
    }
}
