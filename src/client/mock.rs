//! Mock teammate API for testing
//!
//! In-memory implementation of [`TeammateApi`] for unit testing without
//! making real API calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TeammateApi;
use super::models::{Teammate, TeammateRequest};
use crate::error::{ApiError, Result};

/// Mock API client backed by an in-memory store keyed by email.
///
/// Configure state and failure injection via builder methods, then use in
/// tests wherever a `TeammateApi` is expected.
pub struct MockTeammateClient {
    /// Teammates keyed by email
    teammates: Arc<Mutex<HashMap<String, Teammate>>>,
    /// Error to return (if any), consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Number of upcoming calls that fail rate-limited
    rate_limit_remaining: Arc<Mutex<u32>>,
    /// Track number of calls for verification
    call_counts: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub create: usize,
    pub get: usize,
    pub update: usize,
    pub delete: usize,
}

impl Default for MockTeammateClient {
    fn default() -> Self {
        Self {
            teammates: Arc::new(Mutex::new(HashMap::new())),
            error: Arc::new(Mutex::new(None)),
            rate_limit_remaining: Arc::new(Mutex::new(0)),
            call_counts: Arc::new(Mutex::new(CallCounts::default())),
        }
    }
}

impl MockTeammateClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with the given error.
    pub fn with_error(self, error: ApiError) -> Self {
        *self.error.try_lock().expect("mock is not shared during setup") = Some(error);
        self
    }

    /// Fail the next `count` calls with a rate-limit error.
    pub fn with_rate_limit_times(self, count: u32) -> Self {
        *self
            .rate_limit_remaining
            .try_lock()
            .expect("mock is not shared during setup") = count;
        self
    }

    /// Snapshot of per-operation call counts.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_counts.lock().await.clone()
    }

    /// Shared failure-injection gate, run at the top of every operation.
    async fn check_failures(&self) -> Result<()> {
        let mut remaining = self.rate_limit_remaining.lock().await;
        if *remaining > 0 {
            *remaining -= 1;
            return Err(ApiError::RateLimit(Duration::ZERO));
        }
        drop(remaining);

        if let Some(error) = self.error.lock().await.take() {
            return Err(error);
        }
        Ok(())
    }

    async fn find_key(&self, identifier: &str) -> Option<String> {
        let teammates = self.teammates.lock().await;
        if teammates.contains_key(identifier) {
            return Some(identifier.to_string());
        }
        teammates
            .values()
            .find(|t| t.username == identifier)
            .map(|t| t.email.clone())
    }
}

#[async_trait]
impl TeammateApi for MockTeammateClient {
    async fn create_teammate(&self, request: TeammateRequest) -> Result<Teammate> {
        self.call_counts.lock().await.create += 1;
        self.check_failures().await?;

        let mut teammates = self.teammates.lock().await;
        if teammates.contains_key(&request.email) {
            return Err(ApiError::BadRequest(format!(
                "teammate {} already exists",
                request.email
            )));
        }

        let username = request
            .email
            .split('@')
            .next()
            .unwrap_or(&request.email)
            .to_string();
        let teammate = Teammate {
            username,
            email: request.email.clone(),
            first_name: request.first_name,
            last_name: request.last_name,
            is_admin: request.is_admin,
            persona: request.persona,
            scopes: request.scopes,
        };
        teammates.insert(request.email, teammate.clone());
        Ok(teammate)
    }

    async fn get_teammate(&self, identifier: &str) -> Result<Teammate> {
        self.call_counts.lock().await.get += 1;
        self.check_failures().await?;

        let key = self
            .find_key(identifier)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("teammate {identifier} does not exist")))?;
        let teammates = self.teammates.lock().await;
        Ok(teammates[&key].clone())
    }

    async fn update_teammate(
        &self,
        identifier: &str,
        request: TeammateRequest,
    ) -> Result<Teammate> {
        self.call_counts.lock().await.update += 1;
        self.check_failures().await?;

        let key = self
            .find_key(identifier)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("teammate {identifier} does not exist")))?;

        let mut teammates = self.teammates.lock().await;
        let existing = teammates.remove(&key).ok_or_else(|| {
            ApiError::NotFound(format!("teammate {identifier} does not exist"))
        })?;
        let updated = Teammate {
            username: existing.username,
            email: request.email.clone(),
            first_name: request.first_name,
            last_name: request.last_name,
            is_admin: request.is_admin,
            persona: request.persona,
            scopes: request.scopes,
        };
        teammates.insert(request.email, updated.clone());
        Ok(updated)
    }

    async fn delete_teammate(&self, identifier: &str) -> Result<()> {
        self.call_counts.lock().await.delete += 1;
        self.check_failures().await?;

        let key = self
            .find_key(identifier)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("teammate {identifier} does not exist")))?;
        self.teammates.lock().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::TeammateBuilder;
    use crate::client::models::Persona;

    #[tokio::test]
    async fn test_create_then_read_round_trip() {
        let mock = MockTeammateClient::new();
        let request = TeammateBuilder::new("jane@example.org")
            .persona(Persona::Observer)
            .scopes(["mail.send", "alerts.read"])
            .request();

        let created = mock.create_teammate(request.clone()).await.unwrap();
        assert!(!created.username.is_empty());

        let read = mock.get_teammate("jane@example.org").await.unwrap();
        assert_eq!(read.email, request.email);
        assert_eq!(read.first_name, request.first_name);
        assert_eq!(read.last_name, request.last_name);
        assert_eq!(read.is_admin, request.is_admin);
        assert_eq!(read.persona, request.persona);
        assert_eq!(read.scopes, request.scopes);
    }

    #[tokio::test]
    async fn test_read_by_server_assigned_username() {
        let mock = MockTeammateClient::new();
        let created = mock
            .create_teammate(TeammateBuilder::new("jane@example.org").request())
            .await
            .unwrap();

        let read = mock.get_teammate(&created.username).await.unwrap();
        assert_eq!(read.email, "jane@example.org");
    }

    #[tokio::test]
    async fn test_update_is_visible_on_next_read() {
        let mock = MockTeammateClient::new();
        mock.create_teammate(TeammateBuilder::new("jane@example.org").request())
            .await
            .unwrap();

        let mut request = TeammateBuilder::new("jane@example.org").request();
        request.is_admin = true;
        mock.update_teammate("jane@example.org", request).await.unwrap();

        let read = mock.get_teammate("jane@example.org").await.unwrap();
        assert!(read.is_admin);
    }

    #[tokio::test]
    async fn test_delete_then_read_is_not_found() {
        let mock = MockTeammateClient::new();
        mock.create_teammate(TeammateBuilder::new("jane@example.org").request())
            .await
            .unwrap();

        mock.delete_teammate("jane@example.org").await.unwrap();

        let err = mock.get_teammate("jane@example.org").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let mock = MockTeammateClient::new();
        mock.create_teammate(TeammateBuilder::new("jane@example.org").request())
            .await
            .unwrap();

        let err = mock
            .create_teammate(TeammateBuilder::new("jane@example.org").request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_injected_error_is_consumed_on_first_use() {
        let mock = MockTeammateClient::new().with_error(ApiError::Forbidden);

        let err = mock.get_teammate("jane@example.org").await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));

        // second call no longer fails with the injected error
        let err = mock.get_teammate("jane@example.org").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
