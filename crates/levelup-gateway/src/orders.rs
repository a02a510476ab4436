//! Order service client.

use crate::client::ServiceClient;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use async_trait::async_trait;
use levelup_commerce::checkout::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// The order record as the remote service reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    /// Order code.
    pub code: String,
    /// Status as reported by the service.
    pub status: String,
    /// Grand total in minor units.
    pub total: i64,
}

/// Remote order submission service.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Persist a new order.
    async fn create_order(&self, order: &Order) -> Result<OrderRecord, GatewayError>;

    /// Update the status of an existing order by its code.
    async fn update_status(&self, code: &str, status: OrderStatus) -> Result<(), GatewayError>;

    /// Fetch an order by its code.
    async fn order_by_code(&self, code: &str) -> Result<OrderRecord, GatewayError>;
}

/// HTTP implementation of [`OrderService`].
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    client: ServiceClient,
    base_url: String,
}

impl HttpOrderService {
    /// Build a client from the gateway configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: ServiceClient::new(config.timeout, config.retry.clone())?,
            base_url: config.order_service_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct StatusUpdateBody<'a> {
    status: &'a str,
}

#[async_trait]
impl OrderService for HttpOrderService {
    async fn create_order(&self, order: &Order) -> Result<OrderRecord, GatewayError> {
        self.client.post_json(&self.url("/orders"), order).await
    }

    async fn update_status(&self, code: &str, status: OrderStatus) -> Result<(), GatewayError> {
        let url = self.url(&format!("/orders/{}/status", code));
        self.client
            .put_unit(
                &url,
                &StatusUpdateBody {
                    status: status.as_str(),
                },
            )
            .await
    }

    async fn order_by_code(&self, code: &str) -> Result<OrderRecord, GatewayError> {
        self.client
            .get_json(&self.url(&format!("/orders/{}", code)))
            .await
    }
}
