//! Property-Based Test Generators
//!
//! Proptest strategies producing bill data that satisfies the validation
//! rules, for "for all bills" style properties.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_billing::{BillInput, NewBill, Situation};

/// Strategy for generating situations
pub fn situation_strategy() -> impl Strategy<Value = Situation> {
    prop_oneof![Just(Situation::Paid), Just(Situation::Unpaid)]
}

/// Strategy for calendar dates between 2000 and 2099
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// Strategy for amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-blank descriptions without surrounding whitespace
pub fn description_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ,.%_-]{0,40}[A-Za-z0-9]"
}

/// Strategy for valid bills
pub fn new_bill_strategy() -> impl Strategy<Value = NewBill> {
    (
        proptest::option::of(date_strategy()),
        date_strategy(),
        amount_strategy(),
        description_strategy(),
        situation_strategy(),
    )
        .prop_map(|(payment_date, due_date, amount, description, situation)| NewBill {
            payment_date,
            due_date,
            amount,
            description,
            situation,
        })
}

/// Strategy for valid create requests, with or without a situation
pub fn bill_input_strategy() -> impl Strategy<Value = BillInput> {
    (new_bill_strategy(), any::<bool>()).prop_map(|(bill, with_situation)| BillInput {
        payment_date: bill.payment_date,
        due_date: Some(bill.due_date),
        amount: Some(bill.amount),
        description: Some(bill.description),
        situation: with_situation.then_some(bill.situation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_billing::BillValidator;

    proptest! {
        #[test]
        fn generated_inputs_are_valid(input in bill_input_strategy()) {
            prop_assert!(BillValidator::validate(&input).is_valid());
        }

        #[test]
        fn generated_descriptions_are_trimmed(description in description_strategy()) {
            prop_assert_eq!(description.trim(), description.as_str());
        }

        #[test]
        fn generated_amounts_have_two_decimals(amount in amount_strategy()) {
            prop_assert_eq!(amount.scale(), 2);
        }
    }
}
