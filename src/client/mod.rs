//! Teammate API client
//!
//! [`TeammateApi`] is the operation seam: the HTTP client implements it, and
//! hosts that reconcile desired state against the API take it by dependency
//! injection so tests can substitute an in-memory implementation.

use async_trait::async_trait;

use crate::error::Result;

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod retry;

pub use http::{ClientBuilder, TeammateClient};
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockTeammateClient;
pub use models::{Persona, Teammate, TeammateRequest};
pub use retry::{RetryPolicy, retry_on_rate_limit};

/// Teammate management operations
///
/// Each operation is a stateless round-trip: no caching, no retries, no
/// shared state between calls. Rate-limit recovery is the caller's concern
/// (see [`retry_on_rate_limit`]).
#[async_trait]
pub trait TeammateApi: Send + Sync {
    /// Create a new SSO teammate from the supplied field set.
    ///
    /// The server assigns the username; the returned record carries it.
    async fn create_teammate(&self, request: TeammateRequest) -> Result<Teammate>;

    /// Retrieve a teammate by email or username.
    async fn get_teammate(&self, identifier: &str) -> Result<Teammate>;

    /// Update an existing teammate.
    ///
    /// The full field set is always sent; this layer computes no diff.
    /// Re-read after updating when the caller needs server truth.
    async fn update_teammate(
        &self,
        identifier: &str,
        request: TeammateRequest,
    ) -> Result<Teammate>;

    /// Delete a teammate by email or username.
    async fn delete_teammate(&self, identifier: &str) -> Result<()>;
}
