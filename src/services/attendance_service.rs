use crate::entities::{attendance_entity as attendance, class_entity as classes, member_entity as members};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct AttendanceService {
    pool: DatabaseConnection,
}

/// Half-open UTC interval covering `date`.
pub(crate) fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + chrono::Duration::days(1))
}

impl AttendanceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn with_members(&self, records: Vec<attendance::Model>) -> AppResult<Vec<AttendanceResponse>> {
        let mut ids: Vec<i64> = records.iter().map(|r| r.member_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let names: HashMap<i64, (String, String)> = if ids.is_empty() {
            HashMap::new()
        } else {
            members::Entity::find()
                .filter(members::Column::Id.is_in(ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|m| (m.id, (format!("{} {}", m.first_name, m.last_name).trim().to_string(), m.email)))
                .collect()
        };

        Ok(records
            .into_iter()
            .map(|r| {
                let (name, email) = names.get(&r.member_id).cloned().unzip();
                AttendanceResponse::new(r, name, email)
            })
            .collect())
    }

    pub async fn list_attendance(
        &self,
        query: AttendanceQuery,
    ) -> AppResult<PaginatedResponse<AttendanceResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let mut select = attendance::Entity::find();
        if let Some(date) = query.date {
            let (start, end) = day_bounds(date);
            select = select
                .filter(attendance::Column::EntryAt.gte(start))
                .filter(attendance::Column::EntryAt.lt(end));
        }

        let paginator = select
            .order_by_desc(attendance::Column::EntryAt)
            .paginate(&self.pool, params.get_limit() as u64);
        let total = paginator.num_items().await?;
        let records = paginator.fetch_page((params.get_page() - 1) as u64).await?;

        let data = self.with_members(records).await?;
        Ok(PaginatedResponse::from_params(data, &params, total as i64))
    }

    pub async fn member_attendance(&self, member_id: i64) -> AppResult<Vec<AttendanceResponse>> {
        let records = attendance::Entity::find()
            .filter(attendance::Column::MemberId.eq(member_id))
            .order_by_desc(attendance::Column::EntryAt)
            .all(&self.pool)
            .await?;
        self.with_members(records).await
    }

    pub async fn check_in(
        &self,
        request: CheckInRequest,
        recorded_by: Option<i64>,
    ) -> AppResult<AttendanceResponse> {
        let member = members::Entity::find_by_id(request.member_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
        if !member.is_active {
            return Err(AppError::ValidationError("Member is not active".to_string()));
        }

        if let Some(class_id) = request.class_id
            && classes::Entity::find_by_id(class_id).one(&self.pool).await?.is_none()
        {
            return Err(AppError::NotFound("Class not found".to_string()));
        }

        let open = attendance::Entity::find()
            .filter(attendance::Column::MemberId.eq(member.id))
            .filter(attendance::Column::ExitAt.is_null())
            .one(&self.pool)
            .await?;
        if open.is_some() {
            return Err(AppError::Conflict(
                "Member already has an open attendance record".to_string(),
            ));
        }

        let record = attendance::ActiveModel {
            member_id: Set(member.id),
            recorded_by: Set(recorded_by),
            class_id: Set(request.class_id),
            entry_at: Set(Utc::now()),
            exit_at: Set(None),
            note: Set(request.note),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let name = format!("{} {}", member.first_name, member.last_name).trim().to_string();
        Ok(AttendanceResponse::new(record, Some(name), Some(member.email)))
    }

    pub async fn check_out(&self, id: i64) -> AppResult<AttendanceResponse> {
        let record = attendance::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))?;
        if !record.is_open() {
            return Err(AppError::ValidationError("Exit already recorded".to_string()));
        }

        // the exit is written at most once even under concurrent check-outs
        let now = Utc::now();
        let result = attendance::Entity::update_many()
            .col_expr(attendance::Column::ExitAt, Expr::value(now))
            .filter(attendance::Column::Id.eq(id))
            .filter(attendance::Column::ExitAt.is_null())
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::ValidationError("Exit already recorded".to_string()));
        }

        let closed = attendance::Model {
            exit_at: Some(now),
            ..record
        };
        let mut responses = self.with_members(vec![closed]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::InternalError("Attendance record vanished".to_string()))
    }

    pub async fn delete_attendance(&self, id: i64) -> AppResult<()> {
        let result = attendance::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Attendance record not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn record(exit_at: Option<DateTime<Utc>>) -> attendance::Model {
        attendance::Model {
            id: 10,
            member_id: 3,
            recorded_by: Some(1),
            class_id: None,
            entry_at: Utc::now(),
            exit_at,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_second_check_out_is_rejected() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![record(Some(Utc::now()))]])
            .into_connection();
        let svc = AttendanceService::new(pool);

        let err = svc.check_out(10).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m == "Exit already recorded"));
        // no update issued
        assert_eq!(svc.pool.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_lost_check_out_race_is_rejected() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![record(None)]])
            .append_exec_results([sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let svc = AttendanceService::new(pool);
        assert!(matches!(
            svc.check_out(10).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_check_out_missing_record_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<attendance::Model>::new()])
            .into_connection();
        let svc = AttendanceService::new(pool);
        assert!(matches!(svc.check_out(5).await, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_day_bounds_cover_one_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert_eq!((end - start).num_hours(), 24);
    }
}
