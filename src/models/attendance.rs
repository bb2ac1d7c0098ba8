use crate::entities::attendance_entity as attendance;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInRequest {
    pub member_id: i64,
    pub class_id: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct AttendanceQuery {
    /// Only records whose entry falls on this day (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceResponse {
    pub id: i64,
    pub member_id: i64,
    pub member_name: Option<String>,
    pub member_email: Option<String>,
    pub recorded_by: Option<i64>,
    pub class_id: Option<i64>,
    pub entry_at: DateTime<Utc>,
    pub exit_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub is_open: bool,
}

impl AttendanceResponse {
    pub fn new(record: attendance::Model, member_name: Option<String>, member_email: Option<String>) -> Self {
        let is_open = record.is_open();
        Self {
            id: record.id,
            member_id: record.member_id,
            member_name,
            member_email,
            recorded_by: record.recorded_by,
            class_id: record.class_id,
            entry_at: record.entry_at,
            exit_at: record.exit_at,
            note: record.note,
            is_open,
        }
    }
}
