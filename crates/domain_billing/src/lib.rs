//! Billing Domain - Bill Records and Their Lifecycle
//!
//! This crate owns everything the payment service knows about bills:
//!
//! - **Model**: [`Bill`], [`NewBill`], [`BillInput`] and the [`Situation`] enum
//! - **Validation**: explicit field checks returning every violation at once
//! - **Import**: a fail-fast CSV parser for bulk loads
//! - **Port**: the [`BillStore`] persistence interface
//! - **Service**: [`BillService`], the lifecycle orchestration
//!
//! # Lifecycle
//!
//! ```text
//!   create ──► UNPAID ──pay──► PAID
//!                │               │
//!   import ──────┴───────────────┘   (situation taken from the row)
//!
//!   update: replaces mutable fields, keeps the id
//!   delete: removes the record
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillService, BillInput};
//!
//! let service = BillService::new(store);
//! let bill = service.create(input).await?;
//! service.pay(&bill.id.to_string()).await?;
//! ```

pub mod bill;
pub mod validation;
pub mod import;
pub mod ports;
pub mod service;
pub mod error;

pub use bill::{fit_amount, AmountError, Bill, BillInput, NewBill, Situation, UnknownSituation};
pub use validation::{BillValidator, ValidationResult};
pub use import::BillCsvParser;
pub use ports::{BillFilter, BillStore};
pub use service::BillService;
pub use error::{BillError, ImportError};
