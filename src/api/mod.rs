//! HTTP access to the MindWell backend.
//!
//! `ApiClient` resolves endpoints, attaches the stored token, turns non-2xx
//! responses into typed `ApiError`s and retries through a `RetryPolicy`.
//! The actual bytes go through a `Transport`, which is reqwest in
//! production.

pub mod client;
pub mod credentials;
pub mod error;
#[cfg(test)]
pub mod mock;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::{ApiClient, RequestOptions};
pub use credentials::CredentialStore;
pub use error::{ApiError, ErrorKind};
pub use retry::{RetryMode, RetryPolicy};
pub use transport::{HttpTransport, Transport};
pub use types::{HistoryRecord, MoodEntry};
