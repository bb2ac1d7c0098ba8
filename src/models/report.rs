use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub active_clients: u64,
    pub trainers: u64,
    pub active_classes: u64,
    /// Paid invoices of the current month, in cents.
    pub monthly_income: i64,
    pub today_attendance: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct DateRangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncomeReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: i64,
    pub invoice_count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub count: u64,
}
