//! Core Kernel - Foundational types shared by every layer of the payment service
//!
//! This crate provides the building blocks used across the domain, database
//! and HTTP crates:
//! - Strongly typed identifiers for persisted entities
//! - Paging primitives (`PageRequest`, `Page<T>`)
//! - Field-level validation results
//! - Port traits and the unified port error type

pub mod identifiers;
pub mod paging;
pub mod error;
pub mod ports;

pub use identifiers::{BillId, UserId};
pub use paging::{Page, PageRequest, DEFAULT_PAGE_SIZE};
pub use error::{CoreError, FieldViolation};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
