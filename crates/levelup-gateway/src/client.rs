//! Shared HTTP plumbing for the service clients.

use crate::error::GatewayError;
use crate::retry::RetryPolicy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// HTTP client with timeout and retry handling.
///
/// Wraps `reqwest` so the per-service clients only describe their routes
/// and payloads.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl ServiceClient {
    /// Build a client with the given timeout and retry policy.
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;
        Ok(Self { http, retry })
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        let resp = self.execute(|| self.http.get(url)).await?;
        decode(resp).await
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let resp = self.execute(|| self.http.post(url).json(body)).await?;
        decode(resp).await
    }

    /// PUT a JSON body, expecting no meaningful response payload.
    pub async fn put_unit<B: Serialize>(&self, url: &str, body: &B) -> Result<(), GatewayError> {
        self.execute(|| self.http.put(url).json(body)).await?;
        Ok(())
    }

    /// Send a request, retrying per policy, and return a 2xx response.
    async fn execute(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let mut attempt: u32 = 0;
        loop {
            match build().send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if status < 400 {
                        return Ok(resp);
                    }
                    let url = resp.url().to_string();
                    if self.retry.should_retry_status(status, attempt) {
                        debug!(status, url = %url, attempt, "retrying after HTTP error");
                        self.pause(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(GatewayError::Http { status, url });
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect())
                        && self.retry.should_retry_transport(attempt)
                    {
                        debug!(error = %e, attempt, "retrying after transport error");
                        self.pause(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(GatewayError::from_transport(e));
                }
            }
        }
    }

    async fn pause(&self, attempt: u32) {
        let delay = self.retry.backoff.delay_for_attempt(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
    resp.json::<T>()
        .await
        .map_err(|e| GatewayError::Deserialization(e.to_string()))
}
