//! Billing Domain Ports
//!
//! This module defines the persistence port for bills. The lifecycle service
//! only talks to [`BillStore`]; adapters decide where the records live:
//!
//! - **Postgres Adapter**: `infra_db::adapters::PostgresBillAdapter`
//! - **In-memory Adapter**: [`mock::InMemoryBillStore`], for tests and demos
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::{BillService, BillStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BillStore> = Arc::new(PostgresBillAdapter::new(pool));
//! let service = BillService::new(store);
//! ```
//!
//! # Invariants
//!
//! - Identifiers are assigned only by the store (`save` and `save_all`)
//! - Listing order is insertion order, so pagination is stable
//! - `save_all` persists the whole batch or nothing

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{BillId, DomainPort, HealthCheckable, Page, PageRequest, PortError};

use crate::bill::{Bill, NewBill};

/// Criteria for filtered listings
///
/// Absent criteria match every bill; present ones are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFilter {
    /// Exact due date
    pub due_date: Option<NaiveDate>,
    /// Case-insensitive literal substring of the description
    pub description: Option<String>,
}

impl BillFilter {
    /// Creates a filter, treating a blank description as absent
    pub fn new(due_date: Option<NaiveDate>, description: Option<String>) -> Self {
        Self {
            due_date,
            description: description.filter(|d| !d.trim().is_empty()),
        }
    }

    /// Whether the filter constrains nothing
    pub fn is_empty(&self) -> bool {
        self.due_date.is_none() && self.description.is_none()
    }

    /// Whether a bill satisfies every present criterion
    pub fn matches(&self, bill: &Bill) -> bool {
        if let Some(due_date) = self.due_date {
            if bill.due_date != due_date {
                return false;
            }
        }
        if let Some(ref description) = self.description {
            if !bill
                .description
                .to_lowercase()
                .contains(&description.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Persistence port for bills
///
/// All methods are async and return `Result<T, PortError>` so database and
/// in-memory adapters report failures the same way.
#[async_trait]
pub trait BillStore: DomainPort + HealthCheckable {
    /// Persists a new bill and returns it with its assigned identifier
    async fn save(&self, bill: NewBill) -> Result<Bill, PortError>;

    /// Overwrites every mutable field of an existing bill
    ///
    /// # Returns
    ///
    /// The stored bill, or `PortError::NotFound` when the id is unknown
    async fn update(&self, bill: &Bill) -> Result<Bill, PortError>;

    /// Retrieves a bill by identifier
    async fn find_by_id(&self, id: BillId) -> Result<Option<Bill>, PortError>;

    /// Whether a bill with this identifier exists
    async fn exists_by_id(&self, id: BillId) -> Result<bool, PortError>;

    /// Lists one page of bills in insertion order
    async fn find_all(&self, page: PageRequest) -> Result<Page<Bill>, PortError>;

    /// Lists one page of bills matching the filter, in insertion order
    async fn find_filtered(
        &self,
        filter: &BillFilter,
        page: PageRequest,
    ) -> Result<Page<Bill>, PortError>;

    /// Removes a bill
    ///
    /// # Returns
    ///
    /// `PortError::NotFound` when the id is unknown
    async fn delete_by_id(&self, id: BillId) -> Result<(), PortError>;

    /// Persists a batch atomically, preserving its order
    async fn save_all(&self, bills: Vec<NewBill>) -> Result<Vec<Bill>, PortError>;
}

/// In-memory implementation of BillStore
///
/// Bills are kept in a vector so listing order is insertion order.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory bill store for tests and local runs
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryBillStore {
        bills: Arc<RwLock<Vec<Bill>>>,
    }

    impl InMemoryBillStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store, assigning identifiers in order
        pub async fn with_bills(bills: Vec<NewBill>) -> Self {
            let store = Self::new();
            {
                let mut stored = store.bills.write().await;
                stored.extend(bills.into_iter().map(|b| b.into_bill(BillId::new_v7())));
            }
            store
        }

        /// Number of stored bills
        pub async fn len(&self) -> usize {
            self.bills.read().await.len()
        }

        /// Whether the store holds no bills
        pub async fn is_empty(&self) -> bool {
            self.bills.read().await.is_empty()
        }

        /// Snapshot of every stored bill, in insertion order
        pub async fn snapshot(&self) -> Vec<Bill> {
            self.bills.read().await.clone()
        }
    }

    impl DomainPort for InMemoryBillStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryBillStore {
        async fn health_check(&self) -> core_kernel::HealthCheckResult {
            core_kernel::HealthCheckResult {
                adapter_id: "in-memory-bill-store".to_string(),
                status: core_kernel::AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl BillStore for InMemoryBillStore {
        async fn save(&self, bill: NewBill) -> Result<Bill, PortError> {
            let bill = bill.into_bill(BillId::new_v7());
            self.bills.write().await.push(bill.clone());
            Ok(bill)
        }

        async fn update(&self, bill: &Bill) -> Result<Bill, PortError> {
            let mut bills = self.bills.write().await;
            let stored = bills
                .iter_mut()
                .find(|b| b.id == bill.id)
                .ok_or_else(|| PortError::not_found("Bill", bill.id))?;
            *stored = bill.clone();
            Ok(stored.clone())
        }

        async fn find_by_id(&self, id: BillId) -> Result<Option<Bill>, PortError> {
            Ok(self.bills.read().await.iter().find(|b| b.id == id).cloned())
        }

        async fn exists_by_id(&self, id: BillId) -> Result<bool, PortError> {
            Ok(self.bills.read().await.iter().any(|b| b.id == id))
        }

        async fn find_all(&self, page: PageRequest) -> Result<Page<Bill>, PortError> {
            Ok(Page::from_slice(&self.bills.read().await, page))
        }

        async fn find_filtered(
            &self,
            filter: &BillFilter,
            page: PageRequest,
        ) -> Result<Page<Bill>, PortError> {
            let matching: Vec<Bill> = self
                .bills
                .read()
                .await
                .iter()
                .filter(|b| filter.matches(b))
                .cloned()
                .collect();
            Ok(Page::from_slice(&matching, page))
        }

        async fn delete_by_id(&self, id: BillId) -> Result<(), PortError> {
            let mut bills = self.bills.write().await;
            let position = bills
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| PortError::not_found("Bill", id))?;
            bills.remove(position);
            Ok(())
        }

        async fn save_all(&self, bills: Vec<NewBill>) -> Result<Vec<Bill>, PortError> {
            let saved: Vec<Bill> = bills
                .into_iter()
                .map(|b| b.into_bill(BillId::new_v7()))
                .collect();
            self.bills.write().await.extend(saved.iter().cloned());
            Ok(saved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::InMemoryBillStore;
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_blank_description_filter_is_absent() {
        let filter = BillFilter::new(None, Some("   ".to_string()));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_matches_case_insensitive_substring() {
        let bill = NewBill::new(date(5), dec!(1), "Electricity January").into_bill(BillId::new_v7());

        assert!(BillFilter::new(None, Some("CITY jan".to_string())).matches(&bill));
        assert!(BillFilter::new(Some(date(5)), Some("elec".to_string())).matches(&bill));
        assert!(!BillFilter::new(Some(date(6)), Some("elec".to_string())).matches(&bill));
        assert!(!BillFilter::new(None, Some("water".to_string())).matches(&bill));
    }

    #[test]
    fn test_filter_treats_wildcards_literally() {
        let bill = NewBill::new(date(5), dec!(1), "Rent").into_bill(BillId::new_v7());
        assert!(!BillFilter::new(None, Some("%".to_string())).matches(&bill));
    }

    #[tokio::test]
    async fn test_in_memory_store_keeps_insertion_order() {
        let store = InMemoryBillStore::new();
        for day in 1..=5 {
            store
                .save(NewBill::new(date(day), dec!(10), format!("Bill {day}")))
                .await
                .unwrap();
        }

        let page = store.find_all(PageRequest::new(1, 2).unwrap()).await.unwrap();
        let descriptions: Vec<_> = page.content.iter().map(|b| b.description.as_str()).collect();

        assert_eq!(descriptions, vec!["Bill 3", "Bill 4"]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_in_memory_delete_unknown_is_not_found() {
        let store = InMemoryBillStore::new();
        let error = store.delete_by_id(BillId::new_v7()).await.unwrap_err();
        assert!(error.is_not_found());
    }
}
