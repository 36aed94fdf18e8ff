use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::credentials::CredentialStore;
use super::error::{ApiError, ErrorKind};
use super::retry::RetryPolicy;
use super::transport::{HttpRequest, Method, Transport};
use super::types::{LoginRequest, LoginResponse};

/// Header carrying the persisted auth token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Method and optional JSON body of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
  pub method: Method,
  pub body: Option<Value>,
}

impl RequestOptions {
  pub fn get() -> Self {
    Self {
      method: Method::Get,
      body: None,
    }
  }

  pub fn post<B: Serialize>(body: &B) -> Result<Self, ApiError> {
    let body = serde_json::to_value(body)
      .map_err(|e| ApiError::decode(format!("Failed to encode request body: {}", e)))?;
    Ok(Self {
      method: Method::Post,
      body: Some(body),
    })
  }
}

/// JSON client for the MindWell API.
pub struct ApiClient<T> {
  transport: Arc<T>,
  base_url: Url,
  credentials: CredentialStore,
  retry: RetryPolicy,
}

impl<T> Clone for ApiClient<T> {
  fn clone(&self) -> Self {
    Self {
      transport: Arc::clone(&self.transport),
      base_url: self.base_url.clone(),
      credentials: self.credentials.clone(),
      retry: self.retry.clone(),
    }
  }
}

impl<T: Transport> ApiClient<T> {
  pub fn new(transport: T, base_url: Url, credentials: CredentialStore) -> Self {
    Self {
      transport: Arc::new(transport),
      base_url,
      credentials,
      retry: RetryPolicy::default(),
    }
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  pub fn has_token(&self) -> bool {
    self.credentials.token().is_some()
  }

  /// Issue one call and decode the JSON response.
  ///
  /// Fails with the server's message on a non-success status.
  pub async fn request<R: DeserializeOwned>(
    &self,
    endpoint: &str,
    options: &RequestOptions,
  ) -> Result<R, ApiError> {
    let url = self.endpoint_url(endpoint)?;

    let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
    if let Some(token) = self.credentials.token() {
      headers.push((AUTH_HEADER.to_string(), token));
    }

    debug!("{:?} {}", options.method, url);

    let response = self
      .transport
      .send(HttpRequest {
        method: options.method,
        url,
        headers,
        body: options.body.clone(),
      })
      .await?;

    if !response.is_success() {
      return Err(ApiError::from_response(response.status, &response.body));
    }

    let body: &[u8] = if response.body.is_empty() {
      b"null"
    } else {
      &response.body
    };

    serde_json::from_slice(body)
      .map_err(|e| ApiError::decode(format!("Failed to parse response from {}: {}", endpoint, e)))
  }

  /// Append `endpoint` to the base URL's path, so a server mounted under a
  /// prefix keeps it.
  fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| ApiError {
        kind: ErrorKind::Client,
        status: None,
        message: format!("Base URL {} cannot take a path", self.base_url),
      })?
      .pop_if_empty()
      .extend(endpoint.split('/').filter(|s| !s.is_empty()));
    Ok(url)
  }

  /// `request` under the client's retry policy.
  pub async fn retry_request<R: DeserializeOwned>(
    &self,
    endpoint: &str,
    options: &RequestOptions,
  ) -> Result<R, ApiError> {
    self
      .retry
      .run(|| self.request(endpoint, options))
      .await
  }

  /// Exchange credentials for a token. Not retried.
  pub async fn login(
    &self,
    endpoint: &str,
    email: &str,
    password: &str,
  ) -> Result<String, ApiError> {
    let options = RequestOptions::post(&LoginRequest {
      email: email.to_string(),
      password: password.to_string(),
    })?;

    let response: LoginResponse = self.request(endpoint, &options).await?;
    Ok(response.token)
  }
}
