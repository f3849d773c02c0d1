//! Lifecycle tests for domain_billing

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{BillId, PageRequest};

use domain_billing::ports::mock::InMemoryBillStore;
use domain_billing::{Bill, BillError, BillFilter, BillInput, BillService, ImportError, Situation};
use test_utils::{
    assert_bill_matches, assert_bills_in_order, assert_page_meta, bill_input_strategy,
    new_bill_strategy, BillFixtures, CsvFixtures, TestBillBuilder,
};

const HEADER: &str = "data_vencimento,data_pagamento,valor,descricao,situacao\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (BillService, InMemoryBillStore) {
    let store = InMemoryBillStore::new();
    (BillService::new(Arc::new(store.clone())), store)
}

fn input(due: NaiveDate, amount: Decimal, description: &str) -> BillInput {
    TestBillBuilder::new()
        .with_due_date(due)
        .with_amount(amount)
        .with_description(description)
        .build_input()
}

// ============================================================================
// Create / Find
// ============================================================================

mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_id_and_persists() {
        let (service, store) = setup();
        let bill = service
            .create(input(date(2024, 1, 5), dec!(284.25), "Power"))
            .await
            .unwrap();

        let found = service.find_by_id(&bill.id.to_string()).await.unwrap();
        assert_eq!(found, bill);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_situation() {
        let (service, _) = setup();
        let mut request = input(date(2024, 1, 5), dec!(10), "Water");
        request.situation = Some(Situation::Paid);
        request.payment_date = Some(date(2024, 1, 4));

        let bill = service.create(request).await.unwrap();

        assert_eq!(bill.situation, Situation::Paid);
        assert_eq!(bill.payment_date, Some(date(2024, 1, 4)));
    }

    #[tokio::test]
    async fn test_create_reports_every_invalid_field() {
        let (service, store) = setup();
        let error = service.create(BillInput::default()).await.unwrap_err();

        match error {
            BillError::ValidationFailed(violations) => {
                let names: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(names, vec!["data_vencimento", "valor", "descricao"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_unknown_is_not_found() {
        let (service, _) = setup();
        let id = BillId::new_v7();
        let error = service.find_by_id(&id.to_string()).await.unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            format!("There is no bill register with the code {id}.")
        );
    }
}

// ============================================================================
// Update / Pay / Delete
// ============================================================================

mod mutation_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let (service, _) = setup();
        let bill = service
            .create(input(date(2024, 1, 5), dec!(100), "Old"))
            .await
            .unwrap();

        let mut request = input(date(2024, 2, 5), dec!(200), "New");
        request.payment_date = Some(date(2024, 2, 1));
        request.situation = Some(Situation::Paid);
        let updated = service.update(&bill.id.to_string(), request).await.unwrap();

        assert_eq!(updated.id, bill.id);
        assert_eq!(updated.due_date, date(2024, 2, 5));
        assert_eq!(updated.amount, dec!(200));
        assert_eq!(updated.description, "New");
        assert_eq!(updated.payment_date, Some(date(2024, 2, 1)));
        assert_eq!(updated.situation, Situation::Paid);
    }

    #[tokio::test]
    async fn test_pay_is_idempotent_and_only_touches_situation() {
        let (service, _) = setup();
        let bill = service
            .create(input(date(2024, 1, 5), dec!(99.90), "Internet"))
            .await
            .unwrap();
        let id = bill.id.to_string();

        let paid = service.pay(&id).await.unwrap();
        assert_eq!(paid.situation, Situation::Paid);
        assert_eq!(paid.due_date, bill.due_date);
        assert_eq!(paid.amount, bill.amount);
        assert_eq!(paid.description, bill.description);
        assert_eq!(paid.payment_date, bill.payment_date);

        let again = service.pay(&id).await.unwrap();
        assert_eq!(again, paid);
    }

    #[tokio::test]
    async fn test_delete_removes_bill() {
        let (service, store) = setup();
        let bill = service
            .create(input(date(2024, 1, 5), dec!(1), "Temp"))
            .await
            .unwrap();

        service.delete(&bill.id.to_string()).await.unwrap();

        assert!(store.is_empty().await);
        assert!(service.find_by_id(&bill.id.to_string()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_id_never_mutates_storage() {
        let (service, store) = setup();
        service
            .create(input(date(2024, 1, 5), dec!(1), "Keep"))
            .await
            .unwrap();
        let before = store.snapshot().await;
        let missing = BillId::new_v7().to_string();

        assert!(service.update(&missing, input(date(2024, 1, 1), dec!(2), "X")).await.unwrap_err().is_not_found());
        assert!(service.pay(&missing).await.unwrap_err().is_not_found());
        assert!(service.delete(&missing).await.unwrap_err().is_not_found());

        assert_eq!(store.snapshot().await, before);
    }
}

// ============================================================================
// List / Filter
// ============================================================================

mod query_tests {
    use super::*;

    async fn seeded() -> BillService {
        let (service, _) = setup();
        for (due, description) in [
            (date(2024, 1, 5), "Electricity January"),
            (date(2024, 1, 5), "Water January"),
            (date(2024, 2, 5), "Electricity February"),
            (date(2024, 1, 5), "ELECTRICITY backup"),
        ] {
            service.create(input(due, dec!(10), description)).await.unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let service = seeded().await;
        let page = service.list(PageRequest::new(1, 3).unwrap()).await.unwrap();

        assert_page_meta(&page, 1, 3, 4);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].description, "ELECTRICITY backup");
    }

    #[tokio::test]
    async fn test_filter_by_due_date_and_description() {
        let service = seeded().await;
        let filter = BillFilter::new(Some(date(2024, 1, 5)), Some("electricity".to_string()));
        let page = service.filter(filter, PageRequest::new(0, 10).unwrap()).await.unwrap();

        let descriptions: Vec<_> = page.content.iter().map(|b| b.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Electricity January", "ELECTRICITY backup"]);
        assert_page_meta(&page, 0, 10, 2);
    }

    #[tokio::test]
    async fn test_empty_filter_matches_all() {
        let service = seeded().await;
        let page = service
            .filter(BillFilter::new(None, Some(" ".to_string())), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 4);
    }
}

// ============================================================================
// Import
// ============================================================================

mod import_tests {
    use super::*;

    #[tokio::test]
    async fn test_import_reference_row() {
        let (service, _) = setup();

        let bills = service
            .import_bills(CsvFixtures::single_row().as_bytes())
            .await
            .unwrap();

        assert_eq!(bills.len(), 1);
        let bill = &bills[0];
        assert_bill_matches(bill, &BillFixtures::paid_new_bill());
        assert!(service.find_by_id(&bill.id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn test_import_blank_optionals() {
        let (service, _) = setup();
        let csv = format!("{HEADER}2024-01-05,,12.00,Gas,\n");
        let bills = service.import_bills(csv.as_bytes()).await.unwrap();

        assert!(bills[0].payment_date.is_none());
        assert_eq!(bills[0].situation, Situation::Unpaid);
    }

    #[tokio::test]
    async fn test_import_preserves_row_order_in_listing() {
        let (service, _) = setup();
        let rows: String = (1..=12)
            .map(|n| format!("2024-03-{n:02},,{n}.00,Row {n},\n"))
            .collect();
        let csv = format!("{HEADER}{rows}");

        let imported = service.import_bills(csv.as_bytes()).await.unwrap();
        let listed = service.list(PageRequest::new(0, 50).unwrap()).await.unwrap();

        assert_eq!(imported.len(), 12);
        assert_eq!(listed.content, imported);
        let ids: HashSet<BillId> = imported.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), imported.len());
    }

    #[tokio::test]
    async fn test_malformed_row_aborts_whole_batch() {
        let (service, store) = setup();
        let csv = format!("{HEADER}2024-01-05,,1.00,First,\n2024-01-06,,12,3,Second,\n");

        let error = service.import_bills(csv.as_bytes()).await.unwrap_err();

        assert!(matches!(error, BillError::MalformedInput(ImportError::Csv(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_header_only_imports_nothing() {
        let (service, store) = setup();
        let bills = service.import_bills(HEADER.as_bytes()).await.unwrap();

        assert!(bills.is_empty());
        assert!(store.is_empty().await);
    }
}

// ============================================================================
// Properties
// ============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_created_situation_defaults_or_matches(request in bill_input_strategy()) {
        let (service, _) = setup();
        let expected = request.situation.unwrap_or(Situation::Unpaid);
        let bill: Bill = runtime().block_on(service.create(request)).unwrap();

        prop_assert_eq!(bill.situation, expected);
    }

    #[test]
    fn prop_pay_twice_equals_pay_once(request in bill_input_strategy()) {
        let (service, _) = setup();
        let rt = runtime();
        let bill = rt.block_on(service.create(request)).unwrap();
        let id = bill.id.to_string();

        let once = rt.block_on(service.pay(&id)).unwrap();
        let twice = rt.block_on(service.pay(&id)).unwrap();

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.situation, Situation::Paid);
        prop_assert_eq!(once.amount, bill.amount);
        prop_assert_eq!(once.due_date, bill.due_date);
    }

    #[test]
    fn prop_listing_keeps_insertion_order(bills in proptest::collection::vec(new_bill_strategy(), 0..8)) {
        let rt = runtime();
        let store = rt.block_on(InMemoryBillStore::with_bills(bills.clone()));
        let service = BillService::new(Arc::new(store));

        let page = rt.block_on(service.list(PageRequest::new(0, 50).unwrap())).unwrap();

        assert_page_meta(&page, 0, 50, bills.len() as u64);
        assert_bills_in_order(&page.content, &bills);
    }
}
