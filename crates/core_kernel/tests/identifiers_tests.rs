//! Unit tests for the identifier newtypes

use core_kernel::{BillId, UserId};
use uuid::Uuid;

#[test]
fn test_new_v7_generates_unique_ids() {
    let id1 = BillId::new_v7();
    let id2 = BillId::new_v7();
    assert_ne!(id1, id2);
}

#[test]
fn test_new_v7_generates_time_ordered_ids() {
    let id1 = BillId::new_v7();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let id2 = BillId::new_v7();
    assert!(id1 < id2);
}

#[test]
fn test_parse_trims_whitespace() {
    let uuid = Uuid::new_v4();
    let parsed: BillId = format!("  {}  ", uuid).parse().unwrap();
    assert_eq!(*parsed.as_uuid(), uuid);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("not-a-uuid".parse::<BillId>().is_err());
    assert!("".parse::<UserId>().is_err());
}

#[test]
fn test_serde_is_transparent() {
    let uuid = Uuid::new_v4();
    let id = BillId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", uuid));

    let back: BillId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
