use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::api_trait::SolverApi;

#[derive(Debug, Clone)]
enum MockBehavior {
    Respond(String),
    Fail(String),
    Hang(Duration, String),
}

/// Scripted solving service for tests and offline runs. Every call
/// behaves the same way and is counted.
#[derive(Debug)]
pub struct MockSolverApi {
    name: String,
    behavior: MockBehavior,
    calls: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockSolverApi {
    fn new(name: &str, behavior: MockBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with `body`.
    pub fn responding(name: &str, body: &str) -> Self {
        Self::new(name, MockBehavior::Respond(body.to_string()))
    }

    /// Fails every request as a transport error would.
    pub fn failing(name: &str, reason: &str) -> Self {
        Self::new(name, MockBehavior::Fail(reason.to_string()))
    }

    /// Waits `delay` before answering with `body`.
    pub fn hanging(name: &str, delay: Duration, body: &str) -> Self {
        Self::new(name, MockBehavior::Hang(delay, body.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SolverApi for MockSolverApi {
    fn name(&self) -> &str {
        &self.name
    }

    async fn request(&self, facelets: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(facelets.to_string());
        }
        debug!("[MOCK] {} received {}", self.name, facelets);

        match &self.behavior {
            MockBehavior::Respond(body) => Ok(body.clone()),
            MockBehavior::Fail(reason) => Err(anyhow!("{}: {}", self.name, reason)),
            MockBehavior::Hang(delay, body) => {
                tokio::time::sleep(*delay).await;
                Ok(body.clone())
            }
        }
    }
}
