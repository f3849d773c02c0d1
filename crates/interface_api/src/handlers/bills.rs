//! Bill handlers

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use tracing::debug;

use core_kernel::PageRequest;
use domain_billing::{BillFilter, BillInput};

use crate::dto::bill::*;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

/// Multipart field carrying the CSV document
pub const IMPORT_FIELD: &str = "file";

/// Creates a bill
pub async fn create_bill(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    let bill = state.bills.create(BillInput::from(request)).await?;
    Ok((StatusCode::CREATED, Json(bill.into())))
}

/// Lists bills in insertion order
pub async fn list_bills(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse<BillResponse>>, ApiError> {
    let page = page_request(&state, params.page, params.size)?;
    let bills = state.bills.list(page).await?;
    Ok(Json(bills.into()))
}

/// Gets a bill by ID
pub async fn get_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state.bills.find_by_id(&id).await?;
    Ok(Json(bill.into()))
}

/// Lists bills by due date and description fragment
pub async fn filter_bills(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> Result<Json<PageResponse<BillResponse>>, ApiError> {
    let page = page_request(&state, params.page, params.size)?;
    let due_date = parse_due_date(params.data_vencimento.as_deref())?;

    let filter = BillFilter::new(due_date, params.descricao);
    let bills = state.bills.filter(filter, page).await?;
    Ok(Json(bills.into()))
}

/// Replaces the fields of a bill
pub async fn update_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<BillRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state.bills.update(&id, BillInput::from(request)).await?;
    Ok(Json(bill.into()))
}

/// Marks a bill as paid
pub async fn pay_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    state.bills.pay(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a bill
pub async fn delete_bill(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    state.bills.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Imports every row of an uploaded CSV document
pub async fn import_bills(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<BillResponse>>, ApiError> {
    let mut multipart = multipart?;

    let mut document = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMPORT_FIELD) {
            document = Some(field.bytes().await?);
            break;
        }
    }

    let document = document.ok_or_else(|| {
        ApiError::InvalidParameter(format!(
            "The multipart field '{}' is required.",
            IMPORT_FIELD
        ))
    })?;
    debug!(bytes = document.len(), "Received bill import");

    let bills = state.bills.import_bills(document.as_ref()).await?;
    Ok(Json(bills.into_iter().map(BillResponse::from).collect()))
}

fn page_request(
    state: &AppState,
    page: Option<u32>,
    size: Option<u32>,
) -> Result<PageRequest, ApiError> {
    let size = size.unwrap_or(state.config.default_page_size);
    Ok(PageRequest::new(page.unwrap_or(0), size)?)
}

fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            ApiError::InvalidParameter(format!(
                "URL parameter 'data_vencimento' received value '{}', which is of an invalid type. \
                 Please enter a value compatible with type date (YYYY-MM-DD).",
                raw
            ))
        })
}
