//! Order lifecycle: creation, best-effort submission, payment, status.
//!
//! Nothing in this module raises to its caller. Remote failures degrade
//! to the local archive or the simulated payment fallback, storage
//! failures are swallowed by the stores, and every degradation is
//! reported through an explicit outcome value so tests can pin which
//! path executed.

use levelup_commerce::cart::Cart;
use levelup_commerce::checkout::{
    Order, OrderCode, OrderLineItem, OrderStatus, PaymentCardDetails, ShippingDetails,
};
use levelup_commerce::totals::compute_order_totals;
use levelup_gateway::{OrderService, PaymentGateway, PaymentRequest};
use levelup_store::OrderArchive;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Decline reasons used by the simulated payment fallback.
pub const SIMULATED_DECLINE_MESSAGES: &[&str] = &[
    "Fondos insuficientes",
    "Tarjeta rechazada por el emisor",
    "La transaccion no pudo ser autorizada",
];

/// Stand-in for the payment gateway when the real one is unreachable.
///
/// Approves with a fixed probability after an artificial delay that
/// mimics network latency. This is a presentation-era artifact kept as a
/// configurable fallback; deployments with a real gateway should treat
/// it as a test double.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentFallback {
    /// Artificial processing delay.
    pub latency: Duration,
    /// Probability of approval in [0.0, 1.0].
    pub approval_rate: f64,
}

impl Default for SimulatedPaymentFallback {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
            approval_rate: 0.9,
        }
    }
}

impl SimulatedPaymentFallback {
    /// Produce a simulated outcome for an order.
    pub async fn run(&self, order: &Order) -> PaymentOutcome {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let (approved, message_index) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen::<f64>() < self.approval_rate,
                rng.gen_range(0..SIMULATED_DECLINE_MESSAGES.len()),
            )
        };

        if approved {
            PaymentOutcome::Approved {
                transaction_id: format!("SIM-{}", order.code),
            }
        } else {
            PaymentOutcome::Declined {
                message: SIMULATED_DECLINE_MESSAGES[message_index].to_string(),
            }
        }
    }
}

/// Result of a payment attempt. A decline is a value, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Payment authorized.
    Approved {
        /// Gateway or simulated transaction reference.
        transaction_id: String,
    },
    /// Payment declined.
    Declined {
        /// Human-readable reason for the shopper.
        message: String,
    },
}

impl PaymentOutcome {
    /// Check if the payment was authorized.
    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentOutcome::Approved { .. })
    }
}

/// Which halves of the dual write landed when submitting an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Remote service and local archive both have the order.
    Both,
    /// Only the remote service has the order.
    RemoteOnly,
    /// Only the local archive has the order.
    LocalOnly,
    /// Neither write landed.
    Dropped,
}

impl SubmitOutcome {
    /// Check if the order was persisted anywhere.
    pub fn is_persisted(&self) -> bool {
        !matches!(self, SubmitOutcome::Dropped)
    }

    /// Check if the remote service accepted the order.
    pub fn reached_remote(&self) -> bool {
        matches!(self, SubmitOutcome::Both | SubmitOutcome::RemoteOnly)
    }

    /// Check if the local archive has the order.
    pub fn reached_local(&self) -> bool {
        matches!(self, SubmitOutcome::Both | SubmitOutcome::LocalOnly)
    }
}

/// Which halves of a best-effort status update landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdateOutcome {
    /// The remote service acknowledged the update.
    pub remote: bool,
    /// The local archive had the order and was updated.
    pub local: bool,
}

/// Drives an order through creation, submission, payment and status.
pub struct OrderLifecycle {
    orders: Arc<dyn OrderService>,
    payments: Arc<dyn PaymentGateway>,
    archive: OrderArchive,
    fallback: SimulatedPaymentFallback,
}

impl OrderLifecycle {
    /// Create a lifecycle over the given services and archive.
    pub fn new(
        orders: Arc<dyn OrderService>,
        payments: Arc<dyn PaymentGateway>,
        archive: OrderArchive,
    ) -> Self {
        Self {
            orders,
            payments,
            archive,
            fallback: SimulatedPaymentFallback::default(),
        }
    }

    /// Override the simulated payment fallback.
    pub fn with_payment_fallback(mut self, fallback: SimulatedPaymentFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// The local order archive.
    pub fn archive(&self) -> &OrderArchive {
        &self.archive
    }

    /// Create a pending order from the cart.
    ///
    /// Line items are snapshotted with display fallbacks resolved, so
    /// the order stays stable if the live cart or catalog changes. Every
    /// call generates a fresh code; retries never reuse an order.
    pub fn create_order(
        &self,
        shipping: ShippingDetails,
        cart: &Cart,
        apply_loyalty_discount: bool,
    ) -> Order {
        let items = cart.items.iter().map(OrderLineItem::from_cart_item).collect();
        let totals = compute_order_totals(&cart.items, apply_loyalty_discount);
        Order::new(shipping, items, totals)
    }

    /// Submit the order, belt-and-suspenders: the local archive is
    /// written in addition to the remote attempt, so a receipt survives
    /// an unreachable order service. Never raises.
    pub async fn submit_order(&self, order: &Order) -> SubmitOutcome {
        let local = self.archive.append(order).is_persisted();

        let remote = match self.orders.create_order(order).await {
            Ok(record) => {
                debug!(code = %order.code, remote_status = %record.status, "order submitted");
                true
            }
            Err(e) => {
                warn!(code = %order.code, error = %e, "remote order submission failed");
                false
            }
        };

        match (remote, local) {
            (true, true) => SubmitOutcome::Both,
            (true, false) => SubmitOutcome::RemoteOnly,
            (false, true) => SubmitOutcome::LocalOnly,
            (false, false) => SubmitOutcome::Dropped,
        }
    }

    /// Attempt the payment. Never raises: a transport failure or a
    /// non-approved remote response drops to the simulated fallback, and
    /// a decline comes back as a value.
    pub async fn process_payment(
        &self,
        order: &Order,
        card: &PaymentCardDetails,
    ) -> PaymentOutcome {
        let request = PaymentRequest::for_order(order, card);
        match self.payments.process(&request).await {
            Ok(response) if response.approved => PaymentOutcome::Approved {
                transaction_id: response
                    .transaction_ref
                    .unwrap_or_else(|| format!("TX-{}", order.code)),
            },
            Ok(response) => {
                debug!(
                    code = %order.code,
                    message = response.response_message.as_deref().unwrap_or(""),
                    "gateway did not approve, using simulated outcome"
                );
                self.fallback.run(order).await
            }
            Err(e) => {
                warn!(code = %order.code, error = %e, "payment gateway unreachable, using simulated outcome");
                self.fallback.run(order).await
            }
        }
    }

    /// Update the order status remotely and in the local archive.
    ///
    /// Both halves are attempted regardless of each other; errors are
    /// logged, never thrown.
    pub async fn update_order_status(
        &self,
        code: &OrderCode,
        status: OrderStatus,
    ) -> StatusUpdateOutcome {
        let remote = match self.orders.update_status(code.as_str(), status).await {
            Ok(()) => true,
            Err(e) => {
                warn!(code = %code, error = %e, "remote status update failed");
                false
            }
        };

        let local = self.archive.set_status(code.as_str(), status);

        StatusUpdateOutcome { remote, local }
    }
}

impl std::fmt::Debug for OrderLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderLifecycle")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
