//! API error handling
//!
//! Every failure leaves the API as a problem document:
//!
//! ```json
//! {
//!   "status": 404,
//!   "type": "https://bmstech.com.br/resource-not-found",
//!   "title": "Resource not found",
//!   "detail": "There is no bill register with the code ...",
//!   "user_message": "There is no bill register with the code ...",
//!   "timestamp": "2024-01-05T10:00:00Z"
//! }
//! ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::{CoreError, FieldViolation};
use domain_billing::{BillError, ImportError};

use crate::auth::AuthError;

/// Base URI of the problem type identifiers
pub const PROBLEM_BASE_URI: &str = "https://bmstech.com.br";

/// Message shown to users when the cause must not be disclosed
pub const SYSTEM_ERROR_MSG: &str = "An unexpected internal system error has occurred. \
Please try again and if the problem persists, contact the system administrator.";

/// Detail used when request fields fail validation
pub const INVALID_FIELDS_MSG: &str =
    "One or more fields are invalid. Fill in correctly and try again.";

/// Stable problem categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    SystemError,
    InvalidParameter,
    IncomprehensibleMessage,
    ResourceNotFound,
    EntityInUse,
    BusinessError,
    InvalidData,
    Unauthorized,
    PayloadTooLarge,
}

impl ProblemType {
    pub fn title(&self) -> &'static str {
        match self {
            ProblemType::SystemError => "System error",
            ProblemType::InvalidParameter => "Invalid parameter",
            ProblemType::IncomprehensibleMessage => "Incomprehensible message",
            ProblemType::ResourceNotFound => "Resource not found",
            ProblemType::EntityInUse => "Entity in use",
            ProblemType::BusinessError => "Violation of business rule",
            ProblemType::InvalidData => "Invalid data",
            ProblemType::Unauthorized => "Unauthorized",
            ProblemType::PayloadTooLarge => "Payload too large",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            ProblemType::SystemError => "/system-error",
            ProblemType::InvalidParameter => "/invalid-parameter",
            ProblemType::IncomprehensibleMessage => "/incomprehensible-message",
            ProblemType::ResourceNotFound => "/resource-not-found",
            ProblemType::EntityInUse => "/entity-in-use",
            ProblemType::BusinessError => "/erro-business",
            ProblemType::InvalidData => "/invalid-data",
            ProblemType::Unauthorized => "/unauthorized",
            ProblemType::PayloadTooLarge => "/payload-too-large",
        }
    }

    pub fn uri(&self) -> String {
        format!("{}{}", PROBLEM_BASE_URI, self.path())
    }
}

/// A field-level entry of a problem document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemObject {
    pub name: String,
    pub user_message: String,
}

impl From<FieldViolation> for ProblemObject {
    fn from(violation: FieldViolation) -> Self {
        Self {
            name: violation.field,
            user_message: violation.message,
        }
    }
}

/// Problem response body
#[derive(Debug, Serialize)]
pub struct Problem {
    pub status: u16,
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<ProblemObject>>,
}

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Incomprehensible message: {0}")]
    IncomprehensibleMessage(String),

    #[error("Invalid data: {detail}")]
    InvalidData {
        detail: String,
        objects: Vec<ProblemObject>,
    },

    #[error("Business rule violated: {0}")]
    Business(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure carrying one entry per invalid field
    pub fn invalid_fields(violations: Vec<FieldViolation>) -> Self {
        ApiError::InvalidData {
            detail: INVALID_FIELDS_MSG.to_string(),
            objects: violations.into_iter().map(ProblemObject::from).collect(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidParameter(_)
            | ApiError::IncomprehensibleMessage(_)
            | ApiError::InvalidData { .. }
            | ApiError::Business(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn problem_type(&self) -> ProblemType {
        match self {
            ApiError::NotFound(_) => ProblemType::ResourceNotFound,
            ApiError::InvalidParameter(_) => ProblemType::InvalidParameter,
            ApiError::IncomprehensibleMessage(_) => ProblemType::IncomprehensibleMessage,
            ApiError::InvalidData { .. } => ProblemType::InvalidData,
            ApiError::Business(_) => ProblemType::BusinessError,
            ApiError::Conflict(_) => ProblemType::EntityInUse,
            ApiError::Unauthorized(_) => ProblemType::Unauthorized,
            ApiError::PayloadTooLarge(_) => ProblemType::PayloadTooLarge,
            ApiError::Internal(_) => ProblemType::SystemError,
        }
    }

    /// Builds the problem document; internal details never leave the process
    pub fn to_problem(&self) -> Problem {
        let status = self.status();
        let problem_type = self.problem_type();

        let (detail, user_message, objects) = match self {
            ApiError::NotFound(msg)
            | ApiError::Business(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg) => {
                (msg.clone(), Some(msg.clone()), None)
            }
            ApiError::InvalidParameter(msg) | ApiError::IncomprehensibleMessage(msg) => {
                (msg.clone(), Some(SYSTEM_ERROR_MSG.to_string()), None)
            }
            ApiError::InvalidData { detail, objects } => {
                (detail.clone(), Some(detail.clone()), Some(objects.clone()))
            }
            ApiError::Unauthorized(msg) => (msg.clone(), None, None),
            ApiError::Internal(_) => (
                SYSTEM_ERROR_MSG.to_string(),
                Some(SYSTEM_ERROR_MSG.to_string()),
                None,
            ),
        };

        Problem {
            status: status.as_u16(),
            problem_type: problem_type.uri(),
            title: problem_type.title().to_string(),
            detail,
            user_message,
            timestamp: Utc::now(),
            objects,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(cause) => error!(cause = %cause, "Unexpected failure"),
            other => warn!(error = %other, "Request rejected"),
        }

        let body = self.to_problem();
        (self.status(), Json(body)).into_response()
    }
}

impl From<BillError> for ApiError {
    fn from(err: BillError) -> Self {
        match err {
            BillError::NotFound(_) => ApiError::NotFound(err.to_string()),
            BillError::InvalidId(raw) => ApiError::InvalidParameter(format!(
                "URL parameter 'id' received value '{}', which is of an invalid type. \
                 Please enter a value compatible with type UUID.",
                raw
            )),
            BillError::ValidationFailed(violations) => ApiError::invalid_fields(violations),
            BillError::MalformedInput(import) => import_problem(import),
            BillError::Conflict(msg) => ApiError::Conflict(msg),
            BillError::Internal(msg) => ApiError::Internal(msg),
            BillError::Store(port) => ApiError::Internal(port.to_string()),
        }
    }
}

fn import_problem(err: ImportError) -> ApiError {
    let detail = format!("The imported file is invalid: {}", err);
    let objects = match &err {
        ImportError::MalformedRow { row, field, value, reason } => vec![ProblemObject {
            name: format!("row {}: {}", row, field),
            user_message: format!("Invalid value '{}': {}", value, reason),
        }],
        other => vec![ProblemObject {
            name: match other.row() {
                Some(row) => format!("row {}", row),
                None => "file".to_string(),
            },
            user_message: other.to_string(),
        }],
    };
    ApiError::InvalidData { detail, objects }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::InvalidParameter(msg),
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::Configuration(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(msg) => ApiError::Internal(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::IncomprehensibleMessage(format!(
                "The request body has an invalid value. {}",
                err.body_text()
            )),
            JsonRejection::MissingJsonContentType(_) => ApiError::IncomprehensibleMessage(
                "The request body must be sent as application/json.".to_string(),
            ),
            _ => ApiError::IncomprehensibleMessage(
                "The request body is invalid. Check syntax error.".to_string(),
            ),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidParameter(format!(
            "The query string is invalid. {}",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidParameter(format!(
            "The URL parameter is invalid. {}",
            rejection.body_text()
        ))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::InvalidParameter(format!(
            "The request must be a multipart upload. {}",
            rejection.body_text()
        ))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(
                "The uploaded file exceeds the maximum allowed size.".to_string(),
            );
        }
        ApiError::InvalidParameter(format!("The multipart body is invalid. {}", err.body_text()))
    }
}
