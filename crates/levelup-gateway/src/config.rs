//! Gateway configuration.

use crate::retry::RetryPolicy;
use std::time::Duration;

/// Configuration for the remote service clients.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the order service (e.g., "http://localhost:3001/api").
    pub order_service_url: String,
    /// Base URL of the payment service.
    pub payment_service_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for failed requests.
    pub retry: RetryPolicy,
}

impl GatewayConfig {
    /// Create a configuration with explicit service URLs.
    pub fn new(
        order_service_url: impl Into<String>,
        payment_service_url: impl Into<String>,
    ) -> Self {
        Self {
            order_service_url: order_service_url.into(),
            payment_service_url: payment_service_url.into(),
            ..Self::default()
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            order_service_url: "http://localhost:3001/api".to_string(),
            payment_service_url: "http://localhost:3002/api".to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}
