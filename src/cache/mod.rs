//! Short-lived in-memory caching.
//!
//! Values are kept per key until their time-to-live elapses. Expiry is
//! detected lazily on read.

mod ttl;

pub use ttl::{TtlCache, DEFAULT_TTL};
