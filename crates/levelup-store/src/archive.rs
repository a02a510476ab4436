//! Locally persisted order archive.
//!
//! The fallback half of the order pipeline's dual write: orders are
//! appended here so a receipt survives even when the remote order
//! service is unreachable.

use crate::checkout_memory::PersistOutcome;
use crate::kv::KvStore;
use levelup_commerce::checkout::{Order, OrderStatus};
use tracing::warn;

/// Fixed key the order list is persisted under.
pub const ORDER_ARCHIVE_KEY: &str = "orders:archive";

/// Append-mostly list of locally saved orders.
///
/// Same policy as the checkout memory store: storage failures degrade to
/// logged no-ops, never errors.
#[derive(Debug, Clone)]
pub struct OrderArchive {
    kv: KvStore,
}

impl OrderArchive {
    /// Create an archive over the given key-value store.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Append an order to the archive.
    pub fn append(&self, order: &Order) -> PersistOutcome {
        let mut orders = self.all();
        orders.push(order.clone());
        match self.kv.set(ORDER_ARCHIVE_KEY, &orders) {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                warn!(code = %order.code, error = %e, "order archive append skipped");
                PersistOutcome::Skipped
            }
        }
    }

    /// All archived orders; unreadable storage loads as empty.
    pub fn all(&self) -> Vec<Order> {
        match self.kv.get::<Vec<Order>>(ORDER_ARCHIVE_KEY) {
            Ok(Some(orders)) => orders,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "order archive unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Find an archived order by its code.
    pub fn find_by_code(&self, code: &str) -> Option<Order> {
        self.all().into_iter().find(|o| o.code.as_str() == code)
    }

    /// Update the status of an archived order.
    ///
    /// Returns true if the order was found and the updated list was
    /// written back.
    pub fn set_status(&self, code: &str, status: OrderStatus) -> bool {
        let mut orders = self.all();
        let Some(order) = orders.iter_mut().find(|o| o.code.as_str() == code) else {
            return false;
        };
        order.set_status(status);
        match self.kv.set(ORDER_ARCHIVE_KEY, &orders) {
            Ok(()) => true,
            Err(e) => {
                warn!(code, error = %e, "order archive status update skipped");
                false
            }
        }
    }
}
