//! Bill record model
//!
//! A bill is a payable record with a due date, an exact amount, a description
//! and a payment situation. Three shapes exist along its lifecycle:
//!
//! - [`BillInput`]: what a client submits; every field may be missing
//! - [`NewBill`]: a validated record that has not been persisted yet
//! - [`Bill`]: a persisted record carrying its store-assigned identifier

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::BillId;

/// Payment state of a bill
///
/// The JSON wire labels (`PAGO`, `NAO_PAGO`) differ from the machine names
/// used in CSV imports and storage (`PAID`, `UNPAID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Situation {
    #[serde(rename = "PAGO")]
    Paid,
    #[default]
    #[serde(rename = "NAO_PAGO")]
    Unpaid,
}

impl Situation {
    pub const ALL: [Situation; 2] = [Situation::Paid, Situation::Unpaid];

    /// Machine name used by CSV imports and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Situation::Paid => "PAID",
            Situation::Unpaid => "UNPAID",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Situation::Paid)
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a machine name does not match any situation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown situation '{0}', expected one of PAID, UNPAID")]
pub struct UnknownSituation(pub String);

impl FromStr for Situation {
    type Err = UnknownSituation;

    /// Parses a machine name; matching is exact and case-sensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Situation::ALL
            .into_iter()
            .find(|situation| situation.as_str() == s)
            .ok_or_else(|| UnknownSituation(s.to_string()))
    }
}

/// Digits kept after the decimal point of an amount
pub const AMOUNT_SCALE: u32 = 2;

/// Digits allowed before the decimal point of an amount
pub const AMOUNT_INTEGER_DIGITS: usize = 17;

/// Why an amount cannot be stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must have at most 2 decimal places")]
    TooPrecise,
    #[error("Amount must have at most 17 integer digits")]
    OutOfRange,
}

/// Checks that an amount fits the stored precision and brings it to that scale
///
/// Trailing zeros beyond the stored scale are dropped; any other digit there
/// is rejected rather than rounded.
pub fn fit_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(AmountError::TooPrecise);
    }
    let integer_digits = amount.abs().trunc().normalize().to_string();
    if integer_digits.trim_start_matches('0').len() > AMOUNT_INTEGER_DIGITS {
        return Err(AmountError::OutOfRange);
    }
    Ok(amount.round_dp(AMOUNT_SCALE))
}

/// Bill fields as submitted by a client, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillInput {
    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub situation: Option<Situation>,
}

/// A validated bill that has not been assigned an identifier yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBill {
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub situation: Situation,
}

impl NewBill {
    /// Creates an unpaid bill without a payment date
    pub fn new(due_date: NaiveDate, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            payment_date: None,
            due_date,
            amount,
            description: description.into(),
            situation: Situation::Unpaid,
        }
    }

    pub fn with_payment_date(mut self, payment_date: NaiveDate) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    pub fn with_situation(mut self, situation: Situation) -> Self {
        self.situation = situation;
        self
    }

    /// Attaches a store-assigned identifier
    pub fn into_bill(self, id: BillId) -> Bill {
        Bill {
            id,
            payment_date: self.payment_date,
            due_date: self.due_date,
            amount: self.amount,
            description: self.description,
            situation: self.situation,
        }
    }
}

/// A persisted bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub situation: Situation,
}

impl Bill {
    /// Marks the bill as paid; paying a paid bill changes nothing
    pub fn pay(&mut self) {
        self.situation = Situation::Paid;
    }

    pub fn is_paid(&self) -> bool {
        self.situation.is_paid()
    }

    /// Overwrites every mutable field, keeping the identifier
    pub fn replace_fields(&mut self, fields: NewBill) {
        self.payment_date = fields.payment_date;
        self.due_date = fields.due_date;
        self.amount = fields.amount;
        self.description = fields.description;
        self.situation = fields.situation;
    }
}
