//! Bill validation rules
//!
//! Create and update requests are checked here before they reach the store.
//! Every failing field is reported, not only the first one.
//!
//! # Validation Rules
//!
//! - `data_vencimento` (due date) is required
//! - `valor` (amount) is required, with at most 2 decimal places and 17
//!   integer digits
//! - `descricao` (description) is required and must not be blank
//! - `situacao` (situation) is optional; the caller decides the fallback

use core_kernel::FieldViolation;

use crate::bill::{fit_amount, BillInput, NewBill, Situation};

/// Wire names of the bill fields
pub mod fields {
    pub const PAYMENT_DATE: &str = "data_pagamento";
    pub const DUE_DATE: &str = "data_vencimento";
    pub const AMOUNT: &str = "valor";
    pub const DESCRIPTION: &str = "descricao";
    pub const SITUATION: &str = "situacao";
}

/// Result of bill validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// List of validation failures
    pub violations: Vec<FieldViolation>,
}

impl ValidationResult {
    /// Whether no rule was violated
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Adds a violation for a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }
}

/// Validator for incoming bill data
pub struct BillValidator;

impl BillValidator {
    /// Checks every rule against the input
    pub fn validate(input: &BillInput) -> ValidationResult {
        let mut result = ValidationResult::default();

        if input.due_date.is_none() {
            result.add(fields::DUE_DATE, "Due date cannot be null");
        }
        match input.amount {
            None => result.add(fields::AMOUNT, "Amount cannot be null"),
            Some(amount) => {
                if let Err(e) = fit_amount(amount) {
                    result.add(fields::AMOUNT, e.to_string());
                }
            }
        }
        match input.description.as_deref() {
            Some(description) if !description.trim().is_empty() => {}
            _ => result.add(fields::DESCRIPTION, "Description cannot be null"),
        }

        result
    }

    /// Validates the input and turns it into a storable bill
    ///
    /// # Arguments
    ///
    /// * `input` - The submitted fields
    /// * `fallback` - Situation to use when the input carries none
    ///
    /// # Errors
    ///
    /// Returns every violated rule when the input is invalid
    pub fn into_new_bill(input: BillInput, fallback: Situation) -> Result<NewBill, Vec<FieldViolation>> {
        let result = Self::validate(&input);
        if !result.is_valid() {
            return Err(result.violations);
        }

        match (input.due_date, input.amount, input.description) {
            (Some(due_date), Some(amount), Some(description)) => Ok(NewBill {
                payment_date: input.payment_date,
                due_date,
                amount: fit_amount(amount).map_err(|_| result.violations.clone())?,
                description,
                situation: input.situation.unwrap_or(fallback),
            }),
            _ => Err(result.violations),
        }
    }
}
