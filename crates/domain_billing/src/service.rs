//! Bill lifecycle service
//!
//! Orchestrates validation, identifier parsing and persistence for every
//! bill operation. The store is injected at construction; the service keeps
//! no state of its own.

use std::io::Read;
use std::sync::Arc;

use tracing::{debug, info, warn};

use core_kernel::{BillId, Page, PageRequest};

use crate::bill::{Bill, BillInput, Situation};
use crate::error::BillError;
use crate::import::BillCsvParser;
use crate::ports::{BillFilter, BillStore};
use crate::validation::BillValidator;

/// Application service for the bill lifecycle
#[derive(Clone)]
pub struct BillService {
    store: Arc<dyn BillStore>,
}

impl BillService {
    /// Creates a service backed by the given store
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for health checks
    pub fn store(&self) -> &Arc<dyn BillStore> {
        &self.store
    }

    /// Validates and persists a new bill
    ///
    /// A missing situation defaults to `UNPAID`.
    pub async fn create(&self, input: BillInput) -> Result<Bill, BillError> {
        let new_bill = BillValidator::into_new_bill(input, Situation::Unpaid)
            .map_err(BillError::ValidationFailed)?;

        let bill = self.store.save(new_bill).await?;
        info!(bill_id = %bill.id, situation = %bill.situation, "Bill created");
        Ok(bill)
    }

    /// Retrieves a bill by its textual identifier
    pub async fn find_by_id(&self, id: &str) -> Result<Bill, BillError> {
        let id = parse_id(id)?;
        self.load(id).await
    }

    /// Lists one page of bills
    pub async fn list(&self, page: PageRequest) -> Result<Page<Bill>, BillError> {
        debug!(page = page.page(), size = page.size(), "Listing bills");
        Ok(self.store.find_all(page).await?)
    }

    /// Lists one page of bills matching the filter
    pub async fn filter(
        &self,
        filter: BillFilter,
        page: PageRequest,
    ) -> Result<Page<Bill>, BillError> {
        let filter = BillFilter::new(filter.due_date, filter.description);
        debug!(
            due_date = ?filter.due_date,
            description = ?filter.description,
            page = page.page(),
            size = page.size(),
            "Filtering bills"
        );
        Ok(self.store.find_filtered(&filter, page).await?)
    }

    /// Replaces every mutable field of an existing bill
    ///
    /// A missing situation keeps the stored one.
    pub async fn update(&self, id: &str, input: BillInput) -> Result<Bill, BillError> {
        let id = parse_id(id)?;
        let mut bill = self.load(id).await?;

        let fields = BillValidator::into_new_bill(input, bill.situation)
            .map_err(BillError::ValidationFailed)?;
        bill.replace_fields(fields);

        let bill = self.store.update(&bill).await.map_err(|e| not_found_or(id, e))?;
        info!(bill_id = %bill.id, "Bill updated");
        Ok(bill)
    }

    /// Marks a bill as paid; paying a paid bill succeeds without change
    pub async fn pay(&self, id: &str) -> Result<Bill, BillError> {
        let id = parse_id(id)?;
        let mut bill = self.load(id).await?;

        if bill.is_paid() {
            debug!(bill_id = %id, "Bill already paid");
            return Ok(bill);
        }

        bill.pay();
        let bill = self.store.update(&bill).await.map_err(|e| not_found_or(id, e))?;
        info!(bill_id = %bill.id, "Bill paid");
        Ok(bill)
    }

    /// Removes a bill
    pub async fn delete(&self, id: &str) -> Result<(), BillError> {
        let id = parse_id(id)?;
        if !self.store.exists_by_id(id).await? {
            return Err(BillError::NotFound(id));
        }

        self.store.delete_by_id(id).await.map_err(|e| not_found_or(id, e))?;
        info!(bill_id = %id, "Bill deleted");
        Ok(())
    }

    /// Parses a CSV document and persists every row as one batch
    ///
    /// Parsing completes before anything is written; a malformed row leaves
    /// the store untouched.
    pub async fn import_bills<R: Read + Send>(&self, reader: R) -> Result<Vec<Bill>, BillError> {
        let candidates = BillCsvParser::parse(reader).map_err(|e| {
            warn!(error = %e, "Bill import rejected");
            BillError::from(e)
        })?;

        if candidates.is_empty() {
            info!("Bill import contained no rows");
            return Ok(Vec::new());
        }

        let count = candidates.len();
        let bills = self.store.save_all(candidates).await?;
        info!(count, "Bills imported");
        Ok(bills)
    }

    async fn load(&self, id: BillId) -> Result<Bill, BillError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(BillError::NotFound(id))
    }
}

fn parse_id(raw: &str) -> Result<BillId, BillError> {
    raw.parse::<BillId>()
        .map_err(|_| BillError::InvalidId(raw.to_string()))
}

fn not_found_or(id: BillId, error: core_kernel::PortError) -> BillError {
    if error.is_not_found() {
        BillError::NotFound(id)
    } else {
        BillError::from(error)
    }
}
