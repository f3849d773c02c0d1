//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! payment service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built bills, users and CSV documents
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL testcontainer with migrations applied
//! - `assertions`: Custom assertion helpers for bills and pages
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
