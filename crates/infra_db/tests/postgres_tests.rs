//! Adapter tests against a real PostgreSQL
//!
//! These start a container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{BillId, PageRequest, PortError};
use domain_billing::{BillFilter, BillStore, NewBill, Situation};
use domain_identity::UserPort;
use infra_db::{PostgresBillAdapter, PostgresUserAdapter};
use test_utils::{
    assert_bill_matches, assert_bills_in_order, BillFixtures, DateFixtures, TestDatabase,
    UserFixtures,
};

async fn bill_store() -> (TestDatabase, PostgresBillAdapter) {
    let db = TestDatabase::start().await.expect("database container");
    let store = db.bill_store();
    (db, store)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_save_and_find_roundtrip() {
    let (_db, store) = bill_store().await;

    let saved = store.save(BillFixtures::paid_new_bill()).await.unwrap();
    let found = store.find_by_id(saved.id).await.unwrap().unwrap();

    assert_eq!(found, saved);
    assert_bill_matches(&found, &BillFixtures::paid_new_bill());
    assert_eq!(found.situation, Situation::Paid);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_missing_bill() {
    let (_db, store) = bill_store().await;
    let id = BillId::new_v7();

    assert!(store.find_by_id(id).await.unwrap().is_none());
    assert!(!store.exists_by_id(id).await.unwrap());
    assert!(store.delete_by_id(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_overwrites_fields() {
    let (_db, store) = bill_store().await;
    let mut bill = store.save(BillFixtures::unpaid_new_bill()).await.unwrap();

    bill.pay();
    bill.description = "Internet February (paid)".to_string();
    let updated = store.update(&bill).await.unwrap();

    assert_eq!(updated.id, bill.id);
    assert!(updated.is_paid());
    assert_eq!(updated.description, "Internet February (paid)");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_save_all_keeps_order_and_pages() {
    let (_db, store) = bill_store().await;
    let bills: Vec<NewBill> = (1..=5)
        .map(|n| NewBill::new(DateFixtures::due_date(), Decimal::from(n), format!("Bill {n}")))
        .collect();

    let saved = store.save_all(bills.clone()).await.unwrap();
    assert_bills_in_order(&saved, &bills);

    let page = store.find_all(PageRequest::new(1, 2).unwrap()).await.unwrap();
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages(), 3);
    let descriptions: Vec<&str> = page.content.iter().map(|b| b.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Bill 3", "Bill 4"]);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_filter_is_case_insensitive_and_literal() {
    let (_db, store) = bill_store().await;
    store
        .save_all(vec![
            NewBill::new(DateFixtures::due_date(), dec!(10), "Power JANUARY"),
            NewBill::new(DateFixtures::due_date(), dec!(20), "Water january"),
            NewBill::new(DateFixtures::ymd(2024, 2, 5), dec!(30), "Power February"),
            NewBill::new(DateFixtures::due_date(), dec!(40), "100% discount"),
        ])
        .await
        .unwrap();

    let page = PageRequest::default();

    let january = store
        .find_filtered(
            &BillFilter::new(Some(DateFixtures::due_date()), Some("January".into())),
            page,
        )
        .await
        .unwrap();
    assert_eq!(january.total_elements, 2);

    let percent = store
        .find_filtered(&BillFilter::new(None, Some("%".into())), page)
        .await
        .unwrap();
    assert_eq!(percent.total_elements, 1);
    assert_eq!(percent.content[0].description, "100% discount");

    let everything = store.find_filtered(&BillFilter::default(), page).await.unwrap();
    assert_eq!(everything.total_elements, 4);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_blank_description_violates_check() {
    let (_db, store) = bill_store().await;

    let error = store
        .save(NewBill::new(DateFixtures::due_date(), dec!(1), "   "))
        .await
        .unwrap_err();

    assert!(matches!(error, PortError::Validation { .. }));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_failed_batch_leaves_no_rows() {
    let (db, store) = bill_store().await;

    let error = store
        .save_all(vec![
            NewBill::new(DateFixtures::due_date(), dec!(1), "First"),
            NewBill::new(DateFixtures::due_date(), dec!(2), " "),
            NewBill::new(DateFixtures::due_date(), dec!(3), "Third"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(error, PortError::Validation { .. }));
    assert_eq!(db.bill_rows().await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_amount_limits_round_trip_exactly() {
    let (_db, store) = bill_store().await;

    for amount in [dec!(99999999999999999.99), dec!(-0.01), dec!(10.50)] {
        let saved = store
            .save(NewBill::new(DateFixtures::due_date(), amount, "Limit"))
            .await
            .unwrap();
        let found = store.find_by_id(saved.id).await.unwrap().unwrap();

        assert_eq!(found.amount, amount);
        assert_eq!(found.amount.to_string(), amount.to_string());
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_user_lookup_ignores_email_case() {
    let db = TestDatabase::start().await.expect("database container");
    let users: PostgresUserAdapter = db.user_port();

    users.create_user(UserFixtures::admin()).await.unwrap();

    let found = users
        .find_by_email("ADMIN@bmstech.com.br")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, UserFixtures::NAME);
    assert!(found.verify_password(UserFixtures::PASSWORD).unwrap());

    let duplicate = users.create_user(UserFixtures::admin()).await.unwrap_err();
    assert!(matches!(duplicate, PortError::Conflict { .. }));
}
