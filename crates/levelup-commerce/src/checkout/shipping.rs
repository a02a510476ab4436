//! Shipping details.

use serde::{Deserialize, Serialize};

/// Delivery details captured by the shipping form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShippingDetails {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Apartment, office or unit number.
    pub unit: Option<String>,
    /// Region.
    pub region: String,
    /// Commune or locality within the region.
    pub locality: String,
    /// Delivery notes for the courier.
    pub delivery_notes: Option<String>,
}

impl ShippingDetails {
    /// Create new shipping details with all mandatory fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        region: impl Into<String>,
        locality: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
            unit: None,
            region: region.into(),
            locality: locality.into(),
            delivery_notes: None,
        }
    }

    /// Set the unit number.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set delivery notes.
    pub fn with_delivery_notes(mut self, notes: impl Into<String>) -> Self {
        self.delivery_notes = Some(notes.into());
        self
    }

    /// Get full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Format as a single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address.clone()];
        if let Some(ref unit) = self.unit {
            parts.push(unit.clone());
        }
        parts.push(self.locality.clone());
        parts.push(self.region.clone());
        parts.join(", ")
    }

    /// Check if all mandatory fields are non-blank after trimming.
    ///
    /// `unit` and `delivery_notes` are optional and do not gate
    /// completeness.
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.address.trim().is_empty()
            && !self.region.trim().is_empty()
            && !self.locality.trim().is_empty()
    }
}
