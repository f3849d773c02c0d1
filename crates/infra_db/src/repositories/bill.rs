//! Bill repository implementation
//!
//! Rows live in `payment.bills`. The `seq` column records insertion order and
//! is the only sort key, so pages are stable and imported batches come back in
//! file order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const BILL_COLUMNS: &str = "id, payment_date, due_date, amount, description, situation";

/// Repository for bill rows
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: PgPool,
}

impl BillRepository {
    /// Creates a new BillRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a bill and returns the stored row
    pub async fn insert(&self, bill: &BillRecord) -> Result<BillRow, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>(&format!(
            "INSERT INTO payment.bills (id, payment_date, due_date, amount, description, situation) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BILL_COLUMNS}"
        ))
        .bind(bill.id)
        .bind(bill.payment_date)
        .bind(bill.due_date)
        .bind(bill.amount)
        .bind(&bill.description)
        .bind(&bill.situation)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts every bill in one transaction, preserving order
    ///
    /// Either all rows are committed or none are.
    pub async fn insert_all(&self, bills: &[BillRecord]) -> Result<Vec<BillRow>, DatabaseError> {
        let sql = format!(
            "INSERT INTO payment.bills (id, payment_date, due_date, amount, description, situation) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BILL_COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(bills.len());
        for bill in bills {
            let row = sqlx::query_as::<_, BillRow>(&sql)
                .bind(bill.id)
                .bind(bill.payment_date)
                .bind(bill.due_date)
                .bind(bill.amount)
                .bind(&bill.description)
                .bind(&bill.situation)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }
        tx.commit().await?;

        Ok(rows)
    }

    /// Overwrites the mutable columns of a bill
    pub async fn update(&self, bill: &BillRecord) -> Result<BillRow, DatabaseError> {
        sqlx::query_as::<_, BillRow>(&format!(
            "UPDATE payment.bills \
             SET payment_date = $2, due_date = $3, amount = $4, description = $5, situation = $6 \
             WHERE id = $1 RETURNING {BILL_COLUMNS}"
        ))
        .bind(bill.id)
        .bind(bill.payment_date)
        .bind(bill.due_date)
        .bind(bill.amount)
        .bind(&bill.description)
        .bind(&bill.situation)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Bill", bill.id))
    }

    /// Finds a bill by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BillRow>, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM payment.bills WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Checks whether a bill exists
    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM payment.bills WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Lists bills in insertion order
    ///
    /// # Returns
    ///
    /// The requested slice and the total row count
    pub async fn find_page(&self, limit: i64, offset: i64) -> Result<(Vec<BillRow>, i64), DatabaseError> {
        let rows = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM payment.bills ORDER BY seq LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payment.bills")
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Lists bills matching an optional due date and description fragment
    ///
    /// The fragment is matched case-insensitively as a literal substring.
    pub async fn find_filtered_page(
        &self,
        due_date: Option<NaiveDate>,
        description: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<BillRow>, i64), DatabaseError> {
        const FILTER: &str = r"($1::date IS NULL OR due_date = $1)
            AND ($2::text IS NULL OR description ILIKE '%' || $2 || '%' ESCAPE '\')";

        let pattern = description.map(escape_like);

        let rows = sqlx::query_as::<_, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM payment.bills WHERE {FILTER} ORDER BY seq LIMIT $3 OFFSET $4"
        ))
        .bind(due_date)
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM payment.bills WHERE {FILTER}"
        ))
        .bind(due_date)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Deletes a bill
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM payment.bills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Bill", id));
        }
        Ok(())
    }
}

/// Escapes LIKE wildcards so the value matches literally
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Values written to `payment.bills`
#[derive(Debug, Clone)]
pub struct BillRecord {
    pub id: Uuid,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub situation: String,
}

/// Database row for a bill
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub id: Uuid,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub situation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("energy"), "energy");
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
