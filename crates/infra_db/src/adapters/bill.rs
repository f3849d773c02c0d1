//! PostgreSQL Bill Adapter
//!
//! Implements the billing domain's `BillStore` port on top of
//! `BillRepository`. Identifiers are generated here, on insert.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBillAdapter;
//! use domain_billing::{BillService, BillStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BillStore> = Arc::new(PostgresBillAdapter::new(pool));
//! let service = BillService::new(store);
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, BillId, DomainPort, HealthCheckResult, HealthCheckable, Page, PageRequest,
    PortError,
};
use domain_billing::{Bill, BillFilter, BillStore, NewBill, Situation};

use crate::error::DatabaseError;
use crate::repositories::bill::{BillRecord, BillRepository, BillRow};

/// PostgreSQL-backed implementation of the BillStore trait
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - connection failures -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresBillAdapter {
    repository: BillRepository,
    pool: PgPool,
}

impl PostgresBillAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BillRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &BillRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBillAdapter {}

#[async_trait]
impl HealthCheckable for PostgresBillAdapter {
    /// Performs a `SELECT 1` round trip
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-bill-adapter".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-bill-adapter".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl BillStore for PostgresBillAdapter {
    #[instrument(skip(self, bill))]
    async fn save(&self, bill: NewBill) -> Result<Bill, PortError> {
        let record = to_record(BillId::new_v7(), &bill);
        let row = self.repository.insert(&record).await?;
        debug!(bill_id = %row.id, "Inserted bill");
        row_to_bill(row)
    }

    #[instrument(skip(self, bill), fields(bill_id = %bill.id))]
    async fn update(&self, bill: &Bill) -> Result<Bill, PortError> {
        let record = BillRecord {
            id: bill.id.into(),
            payment_date: bill.payment_date,
            due_date: bill.due_date,
            amount: bill.amount,
            description: bill.description.clone(),
            situation: bill.situation.as_str().to_string(),
        };
        let row = self.repository.update(&record).await?;
        row_to_bill(row)
    }

    #[instrument(skip(self), fields(bill_id = %id))]
    async fn find_by_id(&self, id: BillId) -> Result<Option<Bill>, PortError> {
        self.repository
            .find_by_id(id.into())
            .await?
            .map(row_to_bill)
            .transpose()
    }

    #[instrument(skip(self), fields(bill_id = %id))]
    async fn exists_by_id(&self, id: BillId) -> Result<bool, PortError> {
        Ok(self.repository.exists(id.into()).await?)
    }

    #[instrument(skip(self), fields(page = page.page(), size = page.size()))]
    async fn find_all(&self, page: PageRequest) -> Result<Page<Bill>, PortError> {
        let (limit, offset) = limit_offset(page);
        let (rows, total) = self.repository.find_page(limit, offset).await?;
        to_page(rows, total, page)
    }

    #[instrument(skip(self, filter), fields(page = page.page(), size = page.size()))]
    async fn find_filtered(
        &self,
        filter: &BillFilter,
        page: PageRequest,
    ) -> Result<Page<Bill>, PortError> {
        debug!(?filter, "Filtering bills");
        let (limit, offset) = limit_offset(page);
        let (rows, total) = self
            .repository
            .find_filtered_page(filter.due_date, filter.description.as_deref(), limit, offset)
            .await?;
        to_page(rows, total, page)
    }

    #[instrument(skip(self), fields(bill_id = %id))]
    async fn delete_by_id(&self, id: BillId) -> Result<(), PortError> {
        Ok(self.repository.delete(id.into()).await?)
    }

    #[instrument(skip(self, bills), fields(count = bills.len()))]
    async fn save_all(&self, bills: Vec<NewBill>) -> Result<Vec<Bill>, PortError> {
        let records: Vec<BillRecord> = bills
            .iter()
            .map(|bill| to_record(BillId::new_v7(), bill))
            .collect();

        let rows = self.repository.insert_all(&records).await?;
        debug!(count = rows.len(), "Inserted bill batch");
        rows.into_iter().map(row_to_bill).collect()
    }
}

fn to_record(id: BillId, bill: &NewBill) -> BillRecord {
    BillRecord {
        id: id.into(),
        payment_date: bill.payment_date,
        due_date: bill.due_date,
        amount: bill.amount,
        description: bill.description.clone(),
        situation: bill.situation.as_str().to_string(),
    }
}

fn row_to_bill(row: BillRow) -> Result<Bill, PortError> {
    let situation = Situation::from_str(&row.situation)
        .map_err(|e| DatabaseError::CorruptRow(format!("bill {}: {}", row.id, e)))?;

    Ok(Bill {
        id: BillId::from(row.id),
        payment_date: row.payment_date,
        due_date: row.due_date,
        amount: row.amount,
        description: row.description,
        situation,
    })
}

fn limit_offset(page: PageRequest) -> (i64, i64) {
    let limit = i64::from(page.size());
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn to_page(rows: Vec<BillRow>, total: i64, page: PageRequest) -> Result<Page<Bill>, PortError> {
    let content = rows
        .into_iter()
        .map(row_to_bill)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(content, page, u64::try_from(total).unwrap_or_default()))
}
