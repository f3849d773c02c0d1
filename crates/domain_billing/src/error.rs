//! Billing domain errors

use thiserror::Error;

use core_kernel::{BillId, FieldViolation, PortError};

/// Errors that can occur in the bill lifecycle
#[derive(Debug, Error)]
pub enum BillError {
    /// No bill exists with the given identifier
    #[error("There is no bill register with the code {0}.")]
    NotFound(BillId),

    /// The identifier is not a valid bill id
    #[error("Invalid bill id: '{0}'")]
    InvalidId(String),

    /// Request fields failed validation
    #[error("Validation failed: {}", format_violations(.0))]
    ValidationFailed(Vec<FieldViolation>),

    /// Imported data could not be parsed
    #[error("Malformed input: {0}")]
    MalformedInput(ImportError),

    /// The bill is referenced elsewhere and cannot be changed
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected failure while reading imported data
    #[error("Internal error: {0}")]
    Internal(String),

    /// The bill store failed
    #[error("Store error: {0}")]
    Store(PortError),
}

impl BillError {
    /// Whether the error reports a missing bill
    pub fn is_not_found(&self) -> bool {
        matches!(self, BillError::NotFound(_))
    }
}

impl From<ImportError> for BillError {
    fn from(error: ImportError) -> Self {
        if error.is_malformed_input() {
            BillError::MalformedInput(error)
        } else {
            BillError::Internal(error.to_string())
        }
    }
}

impl From<PortError> for BillError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Conflict { message } => BillError::Conflict(message),
            other => BillError::Store(other),
        }
    }
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while parsing a CSV import
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input has no header row
    #[error("The file is empty; a header row is required")]
    MissingHeader,

    /// A required column is absent from the header
    #[error("Missing column '{0}' in header")]
    MissingColumn(&'static str),

    /// The same logical column appears more than once
    #[error("Column '{0}' appears more than once in header")]
    DuplicateColumn(String),

    /// The header names a column that is not part of the format
    #[error("Unknown column '{0}' in header")]
    UnknownColumn(String),

    /// A data row carries an invalid value
    #[error("Row {row}: invalid value '{value}' for '{field}': {reason}")]
    MalformedRow {
        /// Line number of the row in the file (the header is line 1)
        row: u64,
        /// Wire name of the offending column
        field: &'static str,
        /// The trimmed offending value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The CSV structure itself is broken or could not be read
    #[error("Unreadable CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ImportError {
    /// Whether the error describes bad input rather than an I/O failure
    pub fn is_malformed_input(&self) -> bool {
        match self {
            ImportError::Csv(error) => !matches!(error.kind(), csv::ErrorKind::Io(_)),
            _ => true,
        }
    }

    /// Line number of the offending row, when one is known
    pub fn row(&self) -> Option<u64> {
        match self {
            ImportError::MalformedRow { row, .. } => Some(*row),
            ImportError::Csv(error) => error.position().map(|p| p.line()),
            ImportError::MissingHeader
            | ImportError::MissingColumn(_)
            | ImportError::DuplicateColumn(_)
            | ImportError::UnknownColumn(_) => Some(1),
        }
    }
}
