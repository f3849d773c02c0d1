//! Repository implementations for domain entities
//!
//! Repositories own the SQL. They speak in row types and `DatabaseError`;
//! the adapters translate to domain models and `PortError`.
//!
//! Queries are built at runtime with `sqlx::query_as`, so the crate compiles
//! without a live database.

pub mod bill;
pub mod user;

pub use bill::{BillRecord, BillRepository, BillRow};
pub use user::{UserRepository, UserRow};
