//! Scripted transport for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};
use tokio::time::Instant;

use super::error::ApiError;
use super::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Default)]
struct Inner {
  responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
  calls: Mutex<Vec<(HttpRequest, Instant)>>,
  gate: Mutex<Option<Arc<Semaphore>>>,
  started: Notify,
}

/// Transport that replays queued responses and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
  inner: Arc<Inner>,
}

impl MockTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_json(&self, status: u16, body: Value) {
    self.push(Ok(HttpResponse {
      status,
      body: serde_json::to_vec(&body).unwrap(),
    }));
  }

  pub fn push_network_error(&self, message: &str) {
    self.push(Err(ApiError::network(message)));
  }

  fn push(&self, response: Result<HttpResponse, ApiError>) {
    self.inner.responses.lock().unwrap().push_back(response);
  }

  /// Make every following request wait until `release` is called.
  pub fn hold(&self) {
    *self.inner.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
  }

  /// Let `n` held requests through.
  pub fn release(&self, n: usize) {
    if let Some(gate) = self.inner.gate.lock().unwrap().as_ref() {
      gate.add_permits(n);
    }
  }

  /// Resolves once a request has reached the transport.
  pub async fn wait_for_call(&self) {
    self.inner.started.notified().await;
  }

  pub fn calls(&self) -> Vec<HttpRequest> {
    self
      .inner
      .calls
      .lock()
      .unwrap()
      .iter()
      .map(|(req, _)| req.clone())
      .collect()
  }

  pub fn call_instants(&self) -> Vec<Instant> {
    self
      .inner
      .calls
      .lock()
      .unwrap()
      .iter()
      .map(|(_, at)| *at)
      .collect()
  }

  pub fn call_count(&self) -> usize {
    self.inner.calls.lock().unwrap().len()
  }
}

#[async_trait]
impl Transport for MockTransport {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    self
      .inner
      .calls
      .lock()
      .unwrap()
      .push((request, Instant::now()));
    self.inner.started.notify_one();

    let gate = self.inner.gate.lock().unwrap().clone();
    if let Some(gate) = gate {
      gate.acquire().await.unwrap().forget();
    }

    self
      .inner
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Err(ApiError::network("no scripted response")))
  }
}
