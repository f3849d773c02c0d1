//! Test Data Builders
//!
//! Builders start from randomized but valid data and let tests pin only the
//! fields they care about.

use chrono::NaiveDate;
use fake::faker::lorem::en::Words;
use fake::Fake;
use rust_decimal::Decimal;

use domain_billing::{BillInput, NewBill, Situation};

use crate::fixtures::DateFixtures;

/// Builder for bill data
#[derive(Debug, Clone)]
pub struct TestBillBuilder {
    payment_date: Option<NaiveDate>,
    due_date: NaiveDate,
    amount: Decimal,
    description: String,
    situation: Option<Situation>,
}

impl Default for TestBillBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBillBuilder {
    /// Creates a builder with a random description and amount
    pub fn new() -> Self {
        let words: Vec<String> = Words(2..5).fake();
        let cents: i64 = (100..1_000_000).fake();
        let day: u32 = (1..=28).fake();

        Self {
            payment_date: None,
            due_date: DateFixtures::ymd(2024, 1, day),
            amount: Decimal::new(cents, 2),
            description: words.join(" "),
            situation: None,
        }
    }

    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = date;
        self
    }

    pub fn with_payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = Some(date);
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_situation(mut self, situation: Situation) -> Self {
        self.situation = Some(situation);
        self
    }

    /// Marks the bill paid on its due date
    pub fn paid(self) -> Self {
        let due = self.due_date;
        self.with_payment_date(due).with_situation(Situation::Paid)
    }

    /// Builds a create/update request
    pub fn build_input(self) -> BillInput {
        BillInput {
            payment_date: self.payment_date,
            due_date: Some(self.due_date),
            amount: Some(self.amount),
            description: Some(self.description),
            situation: self.situation,
        }
    }

    /// Builds a validated bill, unpaid unless a situation was set
    pub fn build(self) -> NewBill {
        NewBill {
            payment_date: self.payment_date,
            due_date: self.due_date,
            amount: self.amount,
            description: self.description,
            situation: self.situation.unwrap_or_default(),
        }
    }

    /// Renders the bill as a CSV row in the default column order
    pub fn build_csv_row(self) -> String {
        let bill = self.build();
        format!(
            "{},{},{},\"{}\",{}",
            bill.due_date,
            bill.payment_date.map(|d| d.to_string()).unwrap_or_default(),
            bill.amount,
            bill.description.replace('"', "\"\""),
            bill.situation.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_defaults_are_valid() {
        let bill = TestBillBuilder::new().build();

        assert!(!bill.description.trim().is_empty());
        assert!(bill.amount > Decimal::ZERO);
        assert_eq!(bill.situation, Situation::Unpaid);
    }

    #[test]
    fn test_builder_overrides() {
        let bill = TestBillBuilder::new()
            .with_amount(dec!(10.00))
            .with_description("Rent")
            .paid()
            .build();

        assert_eq!(bill.amount, dec!(10.00));
        assert_eq!(bill.description, "Rent");
        assert_eq!(bill.payment_date, Some(bill.due_date));
        assert!(bill.situation.is_paid());
    }

    #[test]
    fn test_csv_row_parses_back() {
        let builder = TestBillBuilder::new().with_description("Say \"hi\"");
        let expected = builder.clone().build();
        let csv = format!("{}\n{}\n", crate::CsvFixtures::HEADER, builder.build_csv_row());

        let parsed = domain_billing::BillCsvParser::parse(csv.as_bytes()).unwrap();
        assert_eq!(parsed, vec![expected]);
    }
}
