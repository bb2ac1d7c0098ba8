use crate::entities::InvoiceStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    pub member_id: i64,
    /// Defaults to today.
    pub issued_on: Option<NaiveDate>,
    /// Amount in cents.
    #[schema(example = 3500)]
    pub amount: i64,
    #[schema(example = "monthly membership")]
    pub category: String,
    pub status: Option<InvoiceStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateInvoiceRequest {
    pub issued_on: Option<NaiveDate>,
    pub amount: Option<i64>,
    pub category: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct InvoiceQuery {
    pub member_id: Option<i64>,
    pub status: Option<InvoiceStatus>,
}
