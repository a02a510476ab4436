//! Shopper context and loyalty policy.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Session context for the shopper driving a checkout.
///
/// Passed explicitly into the step resolver and the order lifecycle so
/// neither has to reach into ambient session storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopperContext {
    /// Authenticated user ID.
    pub user_id: UserId,
    /// Account email address.
    pub email: String,
    /// Number of completed orders on this account.
    pub completed_orders: u32,
}

impl ShopperContext {
    /// Create a new shopper context.
    pub fn new(user_id: UserId, email: impl Into<String>, completed_orders: u32) -> Self {
        Self {
            user_id,
            email: email.into(),
            completed_orders,
        }
    }

    /// Check if the shopper has at least one completed order.
    pub fn has_prior_orders(&self) -> bool {
        self.completed_orders > 0
    }
}

/// Email-domain allow-list for the loyalty discount.
///
/// Shoppers whose account email belongs to a partner institution get the
/// loyalty discount on every order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyPolicy {
    domains: Vec<String>,
}

impl LoyaltyPolicy {
    /// Create a policy from an explicit domain list.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.into().to_lowercase())
                .collect(),
        }
    }

    /// Check if an email address qualifies for the loyalty discount.
    ///
    /// Matches the domain part case-insensitively against the allow-list.
    pub fn is_eligible(&self, email: &str) -> bool {
        let Some((_, domain)) = email.trim().rsplit_once('@') else {
            return false;
        };
        let domain = domain.to_lowercase();
        self.domains.iter().any(|d| *d == domain)
    }

    /// The allowed domains.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        Self::new(["duoc.cl", "profesor.duoc.cl", "duocuc.cl"])
    }
}
