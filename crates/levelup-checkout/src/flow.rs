//! Checkout flow state machine.
//!
//! Sequences a purchase across steps: shipping form, summary, payment
//! (or one-click fast checkout), processing, and a success/failure
//! terminal. Entry requires a non-empty cart and an authenticated
//! shopper; anything else redirects out of the flow before it starts.

use crate::error::CheckoutError;
use crate::lifecycle::{OrderLifecycle, PaymentOutcome};
use crate::resolver::{resolve_entry_step, CheckoutStep};
use levelup_commerce::cart::Cart;
use levelup_commerce::checkout::{Order, OrderStatus, PaymentCardDetails, ShippingDetails};
use levelup_commerce::customer::{LoyaltyPolicy, ShopperContext};
use levelup_commerce::totals::{compute_order_totals, OrderTotals};
use levelup_store::{CheckoutMemoryStore, MemoryPatch};
use tracing::debug;

/// Flow configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Whether a standard (non-fast) successful checkout clears the
    /// checkout memory. The storefront historically cleared it only on
    /// the fast path; keep the default until product decides otherwise.
    pub clear_memory_on_standard_success: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            clear_memory_on_standard_success: false,
        }
    }
}

/// Where a shopper is sent when the flow cannot start or is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutRedirect {
    /// Back to the cart page.
    CartPage,
    /// To the login page.
    Login,
    /// To the support contact page.
    SupportContact,
}

/// A single checkout attempt for one shopper and cart.
#[derive(Debug)]
pub struct CheckoutFlow {
    shopper: ShopperContext,
    cart: Cart,
    memory: CheckoutMemoryStore,
    lifecycle: OrderLifecycle,
    loyalty: LoyaltyPolicy,
    config: CheckoutConfig,
    step: CheckoutStep,
    shipping: Option<ShippingDetails>,
    payment: Option<PaymentCardDetails>,
    order: Option<Order>,
    transaction_id: Option<String>,
    failure_message: Option<String>,
}

impl CheckoutFlow {
    /// Enter the checkout flow.
    ///
    /// A missing shopper redirects to login and an empty cart redirects
    /// to the cart page; neither is a state of this machine. Otherwise
    /// the entry step is resolved once from the stored checkout memory,
    /// and stored shipping/payment entries are picked up for prefill.
    pub fn enter(
        shopper: Option<ShopperContext>,
        cart: Cart,
        memory: CheckoutMemoryStore,
        lifecycle: OrderLifecycle,
        loyalty: LoyaltyPolicy,
        config: CheckoutConfig,
    ) -> Result<Self, CheckoutRedirect> {
        let Some(shopper) = shopper else {
            return Err(CheckoutRedirect::Login);
        };
        if cart.is_empty() {
            return Err(CheckoutRedirect::CartPage);
        }

        let stored = memory.load();
        let step = resolve_entry_step(&stored, &shopper);
        debug!(shopper = %shopper.user_id, step = %step, "entering checkout");

        Ok(Self {
            shopper,
            cart,
            memory,
            lifecycle,
            loyalty,
            config,
            step,
            shipping: stored.shipping,
            payment: stored.payment,
            order: None,
            transaction_id: None,
            failure_message: None,
        })
    }

    /// The current step.
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The shopper driving this flow.
    pub fn shopper(&self) -> &ShopperContext {
        &self.shopper
    }

    /// The live cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether the loyalty discount applies to this shopper.
    pub fn loyalty_applies(&self) -> bool {
        self.loyalty.is_eligible(&self.shopper.email)
    }

    /// Totals for the current cart, as shown on the summary and payment
    /// steps. The order snapshot is computed the same way, so the total
    /// never drifts between steps.
    pub fn current_totals(&self) -> OrderTotals {
        compute_order_totals(&self.cart.items, self.loyalty_applies())
    }

    /// Shipping details for form prefill.
    pub fn prefill_shipping(&self) -> Option<&ShippingDetails> {
        self.shipping.as_ref()
    }

    /// Card details for form prefill (also kept across a payment retry).
    pub fn prefill_card(&self) -> Option<&PaymentCardDetails> {
        self.payment.as_ref()
    }

    /// The order created by this attempt, once processing has run.
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Transaction reference of an approved payment.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Decline reason surfaced to the shopper on failure.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    /// Submit the shipping form.
    ///
    /// Incomplete details block the transition. Details are persisted to
    /// checkout memory unless the shopper opted out of saving.
    pub fn submit_shipping(
        &mut self,
        details: ShippingDetails,
        remember: bool,
    ) -> Result<CheckoutStep, CheckoutError> {
        self.require_step(CheckoutStep::ShippingForm, "submit_shipping")?;
        if !details.is_complete() {
            return Err(CheckoutError::IncompleteShipping);
        }

        if remember {
            self.memory.save(
                MemoryPatch::shipping(details.clone())
                    .with_last_step(CheckoutStep::Summary.as_str()),
            );
        }
        self.shipping = Some(details);
        self.step = CheckoutStep::Summary;
        Ok(self.step)
    }

    /// Confirm the order summary. No data mutation.
    pub fn confirm_summary(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.require_step(CheckoutStep::Summary, "confirm_summary")?;
        self.step = CheckoutStep::Payment;
        Ok(self.step)
    }

    /// Submit the payment form and run the purchase.
    ///
    /// Field validation blocks the transition; valid card data is
    /// persisted to checkout memory, then the order is created,
    /// submitted and paid sequentially. Lands on Success or Failure.
    pub async fn submit_payment(
        &mut self,
        card: PaymentCardDetails,
    ) -> Result<CheckoutStep, CheckoutError> {
        self.require_step(CheckoutStep::Payment, "submit_payment")?;
        card.validate().map_err(CheckoutError::InvalidCard)?;

        self.memory.save(
            MemoryPatch::payment(card.clone()).with_last_step(CheckoutStep::Payment.as_str()),
        );
        self.payment = Some(card);
        self.process(false).await
    }

    /// One-click confirmation using previously stored shipping and
    /// payment data.
    pub async fn confirm_fast_checkout(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.require_step(CheckoutStep::FastCheckout, "confirm_fast_checkout")?;
        let stored_ok = self.shipping.as_ref().map(|s| s.is_complete()).unwrap_or(false)
            && self.payment.as_ref().map(|p| p.is_complete()).unwrap_or(false);
        if !stored_ok {
            return Err(CheckoutError::MissingStoredData);
        }
        self.process(true).await
    }

    /// Re-enter the payment step after a decline; the prior card data
    /// stays available for prefill. A new attempt creates a fresh order.
    pub fn retry_payment(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.require_step(CheckoutStep::Failure, "retry_payment")?;
        self.order = None;
        self.failure_message = None;
        self.step = CheckoutStep::Payment;
        Ok(self.step)
    }

    /// Abandon the flow after a decline. No state mutation.
    pub fn abandon(&self) -> Result<CheckoutRedirect, CheckoutError> {
        self.require_step(CheckoutStep::Failure, "abandon")?;
        Ok(CheckoutRedirect::CartPage)
    }

    /// Leave for support after a decline. No state mutation.
    pub fn contact_support(&self) -> Result<CheckoutRedirect, CheckoutError> {
        self.require_step(CheckoutStep::Failure, "contact_support")?;
        Ok(CheckoutRedirect::SupportContact)
    }

    /// Run the purchase: create the order, submit it (best-effort dual
    /// write), process the payment, then settle the terminal step.
    async fn process(&mut self, fast: bool) -> Result<CheckoutStep, CheckoutError> {
        self.step = CheckoutStep::Processing;

        let shipping = self
            .shipping
            .clone()
            .ok_or(CheckoutError::IncompleteShipping)?;
        let card = self.payment.clone().ok_or(CheckoutError::MissingStoredData)?;

        let mut order = self
            .lifecycle
            .create_order(shipping, &self.cart, self.loyalty_applies());

        let submitted = self.lifecycle.submit_order(&order).await;
        debug!(code = %order.code, outcome = ?submitted, "order submitted");
        order.set_status(OrderStatus::Processing);

        match self.lifecycle.process_payment(&order, &card).await {
            PaymentOutcome::Approved { transaction_id } => {
                self.lifecycle
                    .update_order_status(&order.code, OrderStatus::Completed)
                    .await;
                order.set_status(OrderStatus::Completed);

                self.cart.clear();
                if fast || self.config.clear_memory_on_standard_success {
                    self.memory.clear();
                }

                self.transaction_id = Some(transaction_id);
                self.order = Some(order);
                self.step = CheckoutStep::Success;
            }
            PaymentOutcome::Declined { message } => {
                self.lifecycle
                    .update_order_status(&order.code, OrderStatus::Failed)
                    .await;
                order.set_status(OrderStatus::Failed);

                self.failure_message = Some(message);
                self.order = Some(order);
                self.step = CheckoutStep::Failure;
            }
        }

        Ok(self.step)
    }

    fn require_step(
        &self,
        expected: CheckoutStep,
        action: &'static str,
    ) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                from: self.step.as_str(),
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::SimulatedPaymentFallback;
    use async_trait::async_trait;
    use levelup_commerce::cart::CartItem;
    use levelup_commerce::ids::{LineItemId, ProductId, UserId};
    use levelup_commerce::money::Money;
    use levelup_gateway::{
        GatewayError, OrderRecord, OrderService, PaymentGateway, PaymentRequest, PaymentResponse,
    };
    use levelup_store::{KvStore, OrderArchive};
    use std::sync::Arc;
    use std::time::Duration;

    struct ApprovingGateway;

    #[async_trait]
    impl PaymentGateway for ApprovingGateway {
        async fn process(&self, req: &PaymentRequest) -> Result<PaymentResponse, GatewayError> {
            Ok(PaymentResponse {
                approved: true,
                transaction_ref: Some(format!("TX-{}", req.order_code)),
                response_message: None,
            })
        }
    }

    struct RecordingOrderService;

    #[async_trait]
    impl OrderService for RecordingOrderService {
        async fn create_order(&self, order: &Order) -> Result<OrderRecord, GatewayError> {
            Ok(OrderRecord {
                code: order.code.as_str().to_string(),
                status: order.status.as_str().to_string(),
                total: order.totals.total.amount,
            })
        }
        async fn update_status(&self, _: &str, _: OrderStatus) -> Result<(), GatewayError> {
            Ok(())
        }
        async fn order_by_code(&self, code: &str) -> Result<OrderRecord, GatewayError> {
            Err(GatewayError::Http {
                status: 404,
                url: code.to_string(),
            })
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(CartItem::new(
            LineItemId::new("li-1"),
            ProductId::new("JM001"),
            "Catan",
            Money::clp(29_990),
            1,
            "Juegos de Mesa",
        ))
        .unwrap();
        cart
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails::new(
            "Camila",
            "Rojas",
            "camila@gmail.com",
            "+56 9 1234 5678",
            "Av. Providencia 1234",
            "Metropolitana",
            "Providencia",
        )
    }

    fn card() -> PaymentCardDetails {
        PaymentCardDetails::new("4111 1111 1111 1111", "CAMILA ROJAS", "12/27", "123")
    }

    fn flow() -> CheckoutFlow {
        let kv = KvStore::in_memory();
        let lifecycle = OrderLifecycle::new(
            Arc::new(RecordingOrderService),
            Arc::new(ApprovingGateway),
            OrderArchive::new(kv.clone()),
        )
        .with_payment_fallback(SimulatedPaymentFallback {
            latency: Duration::ZERO,
            approval_rate: 1.0,
        });

        CheckoutFlow::enter(
            Some(ShopperContext::new(UserId::new("u-1"), "camila@gmail.com", 0)),
            cart(),
            CheckoutMemoryStore::new(kv),
            lifecycle,
            LoyaltyPolicy::default(),
            CheckoutConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_enter_requires_shopper() {
        let kv = KvStore::in_memory();
        let lifecycle = OrderLifecycle::new(
            Arc::new(RecordingOrderService),
            Arc::new(ApprovingGateway),
            OrderArchive::new(kv.clone()),
        );
        let redirect = CheckoutFlow::enter(
            None,
            cart(),
            CheckoutMemoryStore::new(kv),
            lifecycle,
            LoyaltyPolicy::default(),
            CheckoutConfig::default(),
        )
        .unwrap_err();
        assert_eq!(redirect, CheckoutRedirect::Login);
    }

    #[test]
    fn test_enter_requires_non_empty_cart() {
        let kv = KvStore::in_memory();
        let lifecycle = OrderLifecycle::new(
            Arc::new(RecordingOrderService),
            Arc::new(ApprovingGateway),
            OrderArchive::new(kv.clone()),
        );
        let redirect = CheckoutFlow::enter(
            Some(ShopperContext::new(UserId::new("u-1"), "a@b.cl", 0)),
            Cart::new(),
            CheckoutMemoryStore::new(kv),
            lifecycle,
            LoyaltyPolicy::default(),
            CheckoutConfig::default(),
        )
        .unwrap_err();
        assert_eq!(redirect, CheckoutRedirect::CartPage);
    }

    #[test]
    fn test_fresh_shopper_starts_at_shipping_form() {
        assert_eq!(flow().step(), CheckoutStep::ShippingForm);
    }

    #[test]
    fn test_incomplete_shipping_blocks_transition() {
        let mut f = flow();
        let mut details = shipping();
        details.email = String::new();
        assert!(matches!(
            f.submit_shipping(details, true),
            Err(CheckoutError::IncompleteShipping)
        ));
        assert_eq!(f.step(), CheckoutStep::ShippingForm);
    }

    #[test]
    fn test_shipping_then_summary_then_payment() {
        let mut f = flow();
        assert_eq!(f.submit_shipping(shipping(), true).unwrap(), CheckoutStep::Summary);
        assert_eq!(f.confirm_summary().unwrap(), CheckoutStep::Payment);
    }

    #[test]
    fn test_opting_out_of_saving_keeps_memory_empty() {
        let kv = KvStore::in_memory();
        let lifecycle = OrderLifecycle::new(
            Arc::new(RecordingOrderService),
            Arc::new(ApprovingGateway),
            OrderArchive::new(kv.clone()),
        );
        let memory = CheckoutMemoryStore::new(kv);
        let mut f = CheckoutFlow::enter(
            Some(ShopperContext::new(UserId::new("u-1"), "a@b.cl", 0)),
            cart(),
            memory.clone(),
            lifecycle,
            LoyaltyPolicy::default(),
            CheckoutConfig::default(),
        )
        .unwrap();

        f.submit_shipping(shipping(), false).unwrap();
        assert!(memory.load().shipping.is_none());
        assert_eq!(f.step(), CheckoutStep::Summary);
    }

    #[test]
    fn test_wrong_step_calls_are_rejected() {
        let mut f = flow();
        assert!(matches!(
            f.confirm_summary(),
            Err(CheckoutError::InvalidTransition { .. })
        ));
        assert!(matches!(
            f.retry_payment(),
            Err(CheckoutError::InvalidTransition { .. })
        ));
        assert!(matches!(
            f.abandon(),
            Err(CheckoutError::InvalidTransition { .. })
        ));
        assert_eq!(f.step(), CheckoutStep::ShippingForm);
    }

    #[tokio::test]
    async fn test_invalid_card_blocks_processing() {
        let mut f = flow();
        f.submit_shipping(shipping(), true).unwrap();
        f.confirm_summary().unwrap();

        let mut bad = card();
        bad.cvv = "12".to_string();
        assert!(matches!(
            f.submit_payment(bad).await,
            Err(CheckoutError::InvalidCard(_))
        ));
        assert_eq!(f.step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_standard_path_completes_and_clears_cart() {
        let mut f = flow();
        f.submit_shipping(shipping(), true).unwrap();
        f.confirm_summary().unwrap();
        let step = f.submit_payment(card()).await.unwrap();

        assert_eq!(step, CheckoutStep::Success);
        assert!(f.cart().is_empty());
        let order = f.order().unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(f.transaction_id().is_some());
    }
}
