//! Custom Test Assertions
//!
//! Assertion helpers for bills and pages that report which field differs.

use core_kernel::Page;
use domain_billing::{Bill, NewBill};

/// Asserts that a stored bill carries exactly the fields of a candidate
///
/// # Panics
///
/// Panics naming the first field that differs
pub fn assert_bill_matches(actual: &Bill, expected: &NewBill) {
    assert_eq!(actual.due_date, expected.due_date, "due_date differs for bill {}", actual.id);
    assert_eq!(
        actual.payment_date, expected.payment_date,
        "payment_date differs for bill {}",
        actual.id
    );
    assert_eq!(actual.amount, expected.amount, "amount differs for bill {}", actual.id);
    assert_eq!(
        actual.description, expected.description,
        "description differs for bill {}",
        actual.id
    );
    assert_eq!(actual.situation, expected.situation, "situation differs for bill {}", actual.id);
}

/// Asserts that bills were stored in the same order as the candidates
pub fn assert_bills_in_order(actual: &[Bill], expected: &[NewBill]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Expected {} bills, got {}",
        expected.len(),
        actual.len()
    );
    for (bill, candidate) in actual.iter().zip(expected) {
        assert_bill_matches(bill, candidate);
    }
}

/// Asserts the position metadata of a page
pub fn assert_page_meta<T>(page: &Page<T>, number: u32, size: u32, total_elements: u64) {
    assert_eq!(page.number, number, "Unexpected page number");
    assert_eq!(page.size, size, "Unexpected page size");
    assert_eq!(page.total_elements, total_elements, "Unexpected total element count");
    assert!(
        page.content.len() <= size as usize,
        "Page holds {} elements but size is {}",
        page.content.len(),
        size
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::BillFixtures;
    use core_kernel::{BillId, PageRequest};

    #[test]
    fn test_bill_matches_its_candidate() {
        let candidate = BillFixtures::paid_new_bill();
        let bill = candidate.clone().into_bill(BillId::new_v7());
        assert_bill_matches(&bill, &candidate);
    }

    #[test]
    #[should_panic(expected = "amount differs")]
    fn test_amount_mismatch_panics() {
        let candidate = BillFixtures::paid_new_bill();
        let mut bill = candidate.clone().into_bill(BillId::new_v7());
        bill.amount += rust_decimal::Decimal::ONE;
        assert_bill_matches(&bill, &candidate);
    }

    #[test]
    fn test_page_meta() {
        let page = Page::from_slice(&[1, 2, 3], PageRequest::new(0, 2).unwrap());
        assert_page_meta(&page, 0, 2, 3);
    }
}
