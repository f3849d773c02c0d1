//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresBillAdapter, PostgresUserAdapter};
//!
//! let bills = Arc::new(PostgresBillAdapter::new(pool.clone()));
//! let users = Arc::new(PostgresUserAdapter::new(pool));
//! ```

pub mod bill;
pub mod user;

pub use bill::PostgresBillAdapter;
pub use user::PostgresUserAdapter;
