//! Payment step: card-input formatting and the payment sub-state machine.
//!
//! Formatting is purely local (the card never leaves the client in this
//! simulated flow): strip what the rule forbids, then re-shape what is left.

use serde::{Deserialize, Serialize};

/// Maximum significant digits of a card number
const CARD_NUMBER_DIGITS: usize = 16;
/// Maximum digits of an expiry date (`MMYY`)
const EXPIRY_DIGITS: usize = 4;
/// Maximum digits of a CVV
const CVV_DIGITS: usize = 3;

/// Editable fields of the payment form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentField {
    /// Card number (formatted into blocks of 4)
    CardNumber,
    /// Expiry date (`MM/YY`)
    ExpiryDate,
    /// Card verification value (3 digits)
    Cvv,
    /// Cardholder name (free text)
    CardName,
}

/// Card details captured by the payment form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Formatted card number (`#### #### #### ####`)
    pub number: String,
    /// Expiry date (`MM/YY`)
    pub expiry: String,
    /// Verification value
    pub cvv: String,
    /// Cardholder name
    pub holder: String,
}

/// Where the payment sub-flow currently stands
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PaymentPhase {
    /// Accepting card input
    #[default]
    Editing,
    /// Charge submitted, awaiting the processor
    Processing,
    /// Charge settled; success screen showing until the redirect timer fires
    Succeeded {
        /// Processor receipt for the settled charge
        receipt: super::environment::PaymentReceipt,
    },
}

/// State of the payment step
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentForm {
    /// Card number, formatted
    pub card_number: String,
    /// Expiry date, formatted
    pub expiry_date: String,
    /// CVV, digits only
    pub cvv: String,
    /// Cardholder name, as typed
    pub card_name: String,
    /// Current sub-flow phase
    pub phase: PaymentPhase,
    /// Submission-level message (missing fields, declined charge)
    pub error: Option<String>,
}

impl PaymentForm {
    /// Apply an edit, running the field's formatting rule
    pub fn set_field(&mut self, field: PaymentField, value: &str) {
        match field {
            PaymentField::CardNumber => self.card_number = format_card_number(value),
            PaymentField::ExpiryDate => self.expiry_date = format_expiry(value),
            PaymentField::Cvv => self.cvv = format_cvv(value),
            PaymentField::CardName => self.card_name = value.to_string(),
        }
        self.error = None;
    }

    /// True when any of the four required fields is empty
    #[must_use]
    pub fn has_missing_fields(&self) -> bool {
        self.card_number.is_empty()
            || self.expiry_date.is_empty()
            || self.cvv.is_empty()
            || self.card_name.is_empty()
    }

    /// The captured card details
    #[must_use]
    pub fn card(&self) -> CardDetails {
        CardDetails {
            number: self.card_number.clone(),
            expiry: self.expiry_date.clone(),
            cvv: self.cvv.clone(),
            holder: self.card_name.clone(),
        }
    }

    /// Reset to an empty editing form
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Format a card number: digits only, blocks of 4, at most 16 digits
///
/// `"4242424242424242"` → `"4242 4242 4242 4242"` (19 chars with spaces).
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CARD_NUMBER_DIGITS)
        .collect();

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(*digit);
    }
    formatted
}

/// Format an expiry date: digits only, `/` inserted after 2 digits, 4 max
///
/// Inputs shorter than 2 digits pass through unchanged (modulo stripping).
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(EXPIRY_DIGITS)
        .collect();

    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Format a CVV: digits only, 3 max
#[must_use]
pub fn format_cvv(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CVV_DIGITS)
        .collect()
}
