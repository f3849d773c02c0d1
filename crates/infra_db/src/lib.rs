//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the payment service, using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern:
//!
//! - `repositories`: SQL against the `payment` schema, returning row types
//! - `adapters`: implementations of the domain ports built on the repositories
//! - `pool`: connection pool configuration and embedded migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{connect, DatabaseConfig};
//! use infra_db::adapters::PostgresBillAdapter;
//!
//! let pool = connect(&DatabaseConfig::new("postgres://localhost/payment")).await?;
//! let store = PostgresBillAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{connect, create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::{PostgresBillAdapter, PostgresUserAdapter};
