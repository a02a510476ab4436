//! Payment card details and form validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Card details captured by the payment form.
///
/// Persisting the full record is a known weakness carried from the
/// storefront; the wire to the payment service only ever sees a masked
/// reference (see `masked_number`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentCardDetails {
    /// Card number, space-grouped as typed (max 19 chars incl. spaces).
    pub card_number: String,
    /// Name on the card.
    pub cardholder_name: String,
    /// Expiry in "MM/YY" form.
    pub expiry: String,
    /// Three-digit security code.
    pub cvv: String,
}

/// A payment form field, for field-level validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardField {
    /// Card number.
    Number,
    /// Cardholder name.
    HolderName,
    /// Expiry date.
    Expiry,
    /// Security code.
    Cvv,
}

impl CardField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardField::Number => "card_number",
            CardField::HolderName => "cardholder_name",
            CardField::Expiry => "expiry",
            CardField::Cvv => "cvv",
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{field}: {message}")]
pub struct CardValidationError {
    /// The offending field.
    pub field: CardField,
    /// Human-readable reason.
    pub message: String,
}

impl CardValidationError {
    fn new(field: CardField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl PaymentCardDetails {
    /// Create new card details.
    pub fn new(
        card_number: impl Into<String>,
        cardholder_name: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            cardholder_name: cardholder_name.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    /// The card number with grouping spaces stripped.
    pub fn digits(&self) -> String {
        self.card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    /// The card number masked down to its last four digits.
    pub fn masked_number(&self) -> String {
        let digits = self.digits();
        let skip = digits.chars().count().saturating_sub(4);
        let last4: String = digits.chars().skip(skip).collect();
        format!("**** **** **** {}", last4)
    }

    /// Check if all four fields are non-blank after trimming.
    pub fn is_complete(&self) -> bool {
        !self.card_number.trim().is_empty()
            && !self.cardholder_name.trim().is_empty()
            && !self.expiry.trim().is_empty()
            && !self.cvv.trim().is_empty()
    }

    /// Validate the form fields.
    ///
    /// Returns every failing field so the form can surface them inline:
    /// the number must have at least 16 digits once spaces are stripped,
    /// the holder name is required, the expiry must be `MM/YY` with a
    /// month in 01-12, and the CVV must be exactly three digits.
    pub fn validate(&self) -> Result<(), Vec<CardValidationError>> {
        let mut errors = Vec::new();

        let digits = self.digits();
        if digits.len() < 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            errors.push(CardValidationError::new(
                CardField::Number,
                "el numero de tarjeta debe tener al menos 16 digitos",
            ));
        }

        if self.cardholder_name.trim().is_empty() {
            errors.push(CardValidationError::new(
                CardField::HolderName,
                "el nombre del titular es obligatorio",
            ));
        }

        if !valid_expiry(self.expiry.trim()) {
            errors.push(CardValidationError::new(
                CardField::Expiry,
                "la fecha de expiracion debe tener formato MM/AA",
            ));
        }

        let cvv = self.cvv.trim();
        if cvv.len() != 3 || !cvv.chars().all(|c| c.is_ascii_digit()) {
            errors.push(CardValidationError::new(
                CardField::Cvv,
                "el CVV debe tener 3 digitos",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Check "MM/YY": two digits, a slash, two digits, month in 01-12.
fn valid_expiry(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b'/' {
        return false;
    }
    let (mm, yy) = (&s[..2], &s[3..]);
    if !mm.chars().all(|c| c.is_ascii_digit()) || !yy.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    matches!(mm.parse::<u8>(), Ok(m) if (1..=12).contains(&m))
}
