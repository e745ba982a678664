//! Async client for the SendGrid SSO teammate API
//!
//! Maps four teammate operations (create, read, update, delete) onto the
//! remote REST endpoints and decodes responses into typed records. Errors
//! carry the HTTP status they were built from, so hosts can tell a missing
//! teammate from a throttled request.
//!
//! The client performs no retries; callers that want automatic backoff wrap
//! calls with [`retry_on_rate_limit`]:
//!
//! ```ignore
//! use sendgrid_teammates::{RetryPolicy, TeammateApi, TeammateClient, retry_on_rate_limit};
//!
//! let client = TeammateClient::new(api_key)?;
//! let policy = RetryPolicy::default();
//! let teammate = retry_on_rate_limit(&policy, || client.get_teammate("jane@example.org")).await?;
//! ```

pub mod client;
pub mod error;

pub use client::{
    ClientBuilder, Persona, RetryPolicy, Teammate, TeammateApi, TeammateClient, TeammateRequest,
    retry_on_rate_limit,
};
pub use error::{ApiError, Result};
