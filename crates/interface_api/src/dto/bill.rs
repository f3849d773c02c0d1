//! Bill DTOs
//!
//! Field names follow the public contract (`data_vencimento`, `valor`, ...)
//! while the domain model keeps English names.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillId, Page};
use domain_billing::{Bill, BillInput, Situation};

/// Body of create and update requests
///
/// Every field is optional here so that missing values are reported by the
/// domain validator together, one entry per field. Unknown members such as
/// `id` are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct BillRequest {
    pub data_pagamento: Option<NaiveDate>,
    pub data_vencimento: Option<NaiveDate>,
    pub valor: Option<Decimal>,
    pub descricao: Option<String>,
    pub situacao: Option<Situation>,
}

impl From<BillRequest> for BillInput {
    fn from(request: BillRequest) -> Self {
        BillInput {
            payment_date: request.data_pagamento,
            due_date: request.data_vencimento,
            amount: request.valor,
            description: request.descricao,
            situation: request.situacao,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BillResponse {
    pub id: BillId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data_pagamento: Option<NaiveDate>,
    pub data_vencimento: NaiveDate,
    pub valor: Decimal,
    pub descricao: String,
    pub situacao: Situation,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id,
            data_pagamento: bill.payment_date,
            data_vencimento: bill.due_date,
            valor: bill.amount,
            descricao: bill.description,
            situacao: bill.situation,
        }
    }
}

/// Paging parameters shared by the listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Query of `GET /bills/filter`
///
/// The due date arrives as text so that an empty value can mean "absent".
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub data_vencimento: Option<String>,
    pub descricao: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T, U> From<Page<U>> for PageResponse<T>
where
    T: From<U>,
{
    fn from(page: Page<U>) -> Self {
        let total_pages = page.total_pages();
        Self {
            page: page.number,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
            content: page.content.into_iter().map(T::from).collect(),
        }
    }
}
