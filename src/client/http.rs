//! HTTP implementation of the teammate API

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, Method, Response, StatusCode};

use super::TeammateApi;
use super::models::{Teammate, TeammateRequest};
use crate::error::{ApiError, Result};

/// Teammate API base URL
const API_BASE_URL: &str = "https://api.sendgrid.com/v3";

/// Rate limit: 600 requests per minute (10 per second)
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Default request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fallback when a 429 response carries no usable Retry-After header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Teammate API client
///
/// Stateless between calls: each operation is an independent request/response
/// round-trip. The only shared piece is a limiter pacing outbound dispatch at
/// the API's documented quota.
pub struct TeammateClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TeammateClient {
    /// Create a client with the default base URL and transport settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Start building a client with non-default transport settings.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            requests_per_second: RATE_LIMIT_PER_SECOND,
        }
    }

    /// Dispatch one request, pacing through the limiter first.
    ///
    /// Transport-level failures map to [`ApiError::Network`]; status handling
    /// is the caller's job.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&TeammateRequest>,
    ) -> Result<Response> {
        self.rate_limiter.until_ready().await;
        debug!("{} {}", method, path);

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        Ok(response)
    }
}

/// Builder for [`TeammateClient`]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    requests_per_second: u32,
}

impl ClientBuilder {
    /// Override the API base URL (no trailing slash).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the outbound pacing quota.
    pub fn requests_per_second(mut self, requests_per_second: u32) -> Self {
        self.requests_per_second = requests_per_second;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TeammateClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            NonZeroU32::new(self.requests_per_second).unwrap_or(NonZeroU32::MIN),
        );

        Ok(TeammateClient {
            http,
            base_url: self.base_url,
            api_key: self.api_key,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }
}

#[async_trait]
impl TeammateApi for TeammateClient {
    async fn create_teammate(&self, request: TeammateRequest) -> Result<Teammate> {
        require_non_empty(&request.email, "teammate email")?;

        let response = self
            .send(Method::POST, "/sso/teammates", Some(&request))
            .await?;
        let body = expect_status(response, StatusCode::CREATED).await?;
        parse_teammate(&body)
    }

    async fn get_teammate(&self, identifier: &str) -> Result<Teammate> {
        require_non_empty(identifier, "teammate identifier")?;

        let response = self
            .send(Method::GET, &teammate_path(identifier), None)
            .await?;
        let body = expect_status(response, StatusCode::OK).await?;
        parse_teammate(&body)
    }

    async fn update_teammate(
        &self,
        identifier: &str,
        request: TeammateRequest,
    ) -> Result<Teammate> {
        require_non_empty(identifier, "teammate identifier")?;
        require_non_empty(&request.email, "teammate email")?;

        let response = self
            .send(Method::PATCH, &sso_teammate_path(identifier), Some(&request))
            .await?;
        let body = expect_status(response, StatusCode::OK).await?;
        parse_teammate(&body)
    }

    async fn delete_teammate(&self, identifier: &str) -> Result<()> {
        require_non_empty(identifier, "teammate identifier")?;

        let response = self
            .send(Method::DELETE, &teammate_path(identifier), None)
            .await?;
        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }
}

/// Read/delete route: teammates are addressed outside the SSO prefix.
fn teammate_path(identifier: &str) -> String {
    format!("/teammates/{}", urlencoding::encode(identifier))
}

/// Update route: mutation of SSO teammates goes through the SSO prefix.
fn sso_teammate_path(identifier: &str) -> String {
    format!("/sso/teammates/{}", urlencoding::encode(identifier))
}

/// The identifier routes the request path, so it must exist before any
/// HTTP traffic happens.
fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Gate on the exact success status for the operation; anything else becomes
/// a typed error embedding the response body.
async fn expect_status(response: Response, expected: StatusCode) -> Result<String> {
    let status = response.status();
    if status == expected {
        return response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")));
    }
    Err(error_for_status(status, response).await)
}

async fn error_for_status(status: StatusCode, response: Response) -> ApiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return ApiError::RateLimit(Duration::from_secs(retry_after));
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::BadRequest(body),
        status if status.is_server_error() => ApiError::ServerError {
            status: status.as_u16(),
            body,
        },
        _ => ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    }
}

/// Decode a response body into a teammate record.
///
/// Either the full record decodes or the call fails; a malformed body never
/// yields a record with defaulted identity fields.
fn parse_teammate(body: &str) -> Result<Teammate> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("failed to parse teammate record: {e}")))
}
