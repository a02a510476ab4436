//! Payment service client.

use crate::client::ServiceClient;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use async_trait::async_trait;
use levelup_commerce::checkout::{Order, PaymentCardDetails};
use serde::{Deserialize, Serialize};

/// Payment authorization request.
///
/// Carries only a masked card reference; the full PAN and CVV never
/// leave the checkout memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    /// Order code being paid.
    pub order_code: String,
    /// Amount in minor units.
    pub amount: i64,
    /// Currency code.
    pub currency: String,
    /// Name on the card.
    pub cardholder_name: String,
    /// Masked card number ("**** **** **** 1111").
    pub card_reference: String,
    /// Card expiry "MM/YY".
    pub expiry: String,
}

impl PaymentRequest {
    /// Build a request for an order and card.
    pub fn for_order(order: &Order, card: &PaymentCardDetails) -> Self {
        Self {
            order_code: order.code.as_str().to_string(),
            amount: order.totals.total.amount,
            currency: order.totals.total.currency.code().to_string(),
            cardholder_name: card.cardholder_name.clone(),
            card_reference: card.masked_number(),
            expiry: card.expiry.clone(),
        }
    }
}

/// Payment authorization response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentResponse {
    /// Whether the payment was approved.
    pub approved: bool,
    /// Gateway transaction reference, when approved.
    pub transaction_ref: Option<String>,
    /// Human-readable response message, when declined.
    pub response_message: Option<String>,
}

/// Remote payment processing service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Attempt to authorize a payment.
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentResponse, GatewayError>;
}

/// HTTP implementation of [`PaymentGateway`].
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: ServiceClient,
    base_url: String,
}

impl HttpPaymentGateway {
    /// Build a client from the gateway configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: ServiceClient::new(config.timeout, config.retry.clone())?,
            base_url: config.payment_service_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentResponse, GatewayError> {
        let url = format!("{}/payments", self.base_url);
        self.client.post_json(&url, request).await
    }
}
