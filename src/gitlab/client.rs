//! GitLab API client
//!
//! Provides a typed HTTP client for interacting with the GitLab REST API.
//! Requests are authenticated with a bearer token and executed exactly once:
//! a failed request surfaces immediately as a [`GitLabError`], never retried.

use crate::config::GitLabConfig;
use crate::error::{GitLabError, GitLabResult};
use crate::gitlab::types::Paged;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

/// GitLab API client
pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: crate::util::SecretString,
}

impl GitLabClient {
    /// Create a new GitLab client from configuration
    pub fn new(config: &GitLabConfig) -> GitLabResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(format!("gitlab-mcp/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitLabError::Request)?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add authentication to a request
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.token.expose_secret())
    }

    /// Execute a request once and map non-2xx statuses to errors
    async fn send(&self, request: RequestBuilder) -> GitLabResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(GitLabError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(GitLabError::from_response(status.as_u16(), &body))
    }

    /// Read the response body as JSON
    async fn json_body(response: Response) -> GitLabResult<Value> {
        response
            .json()
            .await
            .map_err(|e| GitLabError::InvalidResponse(format!("Failed to parse response: {e}")))
    }

    /// Decode a JSON value into the expected contract.
    ///
    /// Failures here mean the payload was valid JSON but did not match the
    /// documented shape, which is upstream drift rather than a user error.
    fn decode<T: DeserializeOwned>(value: Value) -> GitLabResult<T> {
        serde_json::from_value(value).map_err(|e| GitLabError::SchemaMismatch(e.to_string()))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> GitLabResult<T> {
        let request = self.authenticate(self.http.get(self.url(endpoint)));
        let response = self.send(request).await?;
        Self::decode(Self::json_body(response).await?)
    }

    /// Make a GET request against a list endpoint, capturing the
    /// server-side total from the `X-Total` header.
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get_paged<T: DeserializeOwned>(&self, endpoint: &str) -> GitLabResult<Paged<T>> {
        let request = self.authenticate(self.http.get(self.url(endpoint)));
        let response = self.send(request).await?;
        let count = total_from_headers(response.headers());
        let items = Self::decode(Self::json_body(response).await?)?;

        Ok(Paged { count, items })
    }

    /// Make a POST request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<T> {
        let request = self.authenticate(self.http.post(self.url(endpoint)).json(body));
        let response = self.send(request).await?;
        Self::decode(Self::json_body(response).await?)
    }

    /// Make a POST request and return the raw JSON value
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<Value> {
        let request = self.authenticate(self.http.post(self.url(endpoint)).json(body));
        let response = self.send(request).await?;
        Self::json_body(response).await
    }

    /// Make a PUT request
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<T> {
        let request = self.authenticate(self.http.put(self.url(endpoint)).json(body));
        let response = self.send(request).await?;
        Self::decode(Self::json_body(response).await?)
    }

    /// Make a PUT request and return the raw JSON value
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<Value> {
        let request = self.authenticate(self.http.put(self.url(endpoint)).json(body));
        let response = self.send(request).await?;
        Self::json_body(response).await
    }

    /// Make a DELETE request, ignoring any response body
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn delete(&self, endpoint: &str) -> GitLabResult<()> {
        let request = self.authenticate(self.http.delete(self.url(endpoint)));
        self.send(request).await?;
        Ok(())
    }
}

/// Server-side total for a list response.
///
/// GitLab reports it in the `X-Total` header; an absent or non-numeric
/// header yields 0, a sentinel distinct from "no matches came back".
fn total_from_headers(headers: &HeaderMap) -> u64 {
    headers
        .get("X-Total")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_total_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Total", HeaderValue::from_static("137"));
        assert_eq!(total_from_headers(&headers), 137);
    }

    #[test]
    fn test_total_missing_defaults_to_zero() {
        assert_eq!(total_from_headers(&HeaderMap::new()), 0);
    }

    #[test]
    fn test_total_non_numeric_defaults_to_zero() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Total", HeaderValue::from_static("many"));
        assert_eq!(total_from_headers(&headers), 0);
    }
}
