//! The wire seam: one HTTP exchange, no retry, no status interpretation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
}

/// A fully resolved request ready to go on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: Method,
  pub url: Url,
  pub headers: Vec<(String, String)>,
  pub body: Option<Value>,
}

#[cfg(test)]
impl HttpRequest {
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// Raw response: status code and body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Something that can carry a JSON request to the server.
///
/// Only failures that produce no response at all come back as `Err`;
/// every HTTP status is returned as a response.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// reqwest-backed transport used against a real server.
#[derive(Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
}

impl HttpTransport {
  pub fn new() -> Result<Self, ApiError> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("mindwell/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { client })
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let mut builder = match request.method {
      Method::Get => self.client.get(request.url.clone()),
      Method::Post => self.client.post(request.url.clone()),
    };

    builder = builder.header(reqwest::header::ACCEPT, "application/json");
    for (name, value) in &request.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &request.body {
      builder = builder.json(body);
    }

    let response = builder
      .send()
      .await
      .map_err(|e| ApiError::network(format!("Network request to {} failed: {}", request.url, e)))?;

    let status = response.status().as_u16();
    let body = response
      .bytes()
      .await
      .map_err(|e| ApiError::network(format!("Failed to read response body: {}", e)))?;

    Ok(HttpResponse {
      status,
      body: body.to_vec(),
    })
  }
}
