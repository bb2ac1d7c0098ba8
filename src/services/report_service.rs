use crate::entities::{
    InvoiceStatus, attendance_entity as attendance, class_entity as classes,
    invoice_entity as invoices, member_entity as members,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::attendance_service::day_bounds;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

#[derive(Clone)]
pub struct ReportService {
    pool: DatabaseConnection,
}

/// First and last day of the month containing `today`.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let next_month = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(today);
    (first, last)
}

fn resolve_range(query: DateRangeQuery, today: NaiveDate) -> AppResult<(NaiveDate, NaiveDate)> {
    let (first, last) = month_bounds(today);
    let start = query.start.unwrap_or(first);
    let end = query.end.unwrap_or(last);
    if end < start {
        return Err(AppError::ValidationError(
            "End date must not precede start date".to_string(),
        ));
    }
    Ok((start, end))
}

/// Entries are bucketed by their UTC calendar day, matching `day_bounds`.
const ENTRY_DAY: &str = "DATE(entry_at AT TIME ZONE 'UTC')";

fn daily_counts(from: DateTime<Utc>, until: DateTime<Utc>) -> Select<attendance::Entity> {
    attendance::Entity::find()
        .select_only()
        .column_as(Expr::cust(ENTRY_DAY), "day")
        .column_as(Expr::cust("COUNT(*)"), "count")
        .filter(attendance::Column::EntryAt.gte(from))
        .filter(attendance::Column::EntryAt.lt(until))
        .group_by(Expr::cust(ENTRY_DAY))
        .order_by(Expr::cust(ENTRY_DAY), Order::Asc)
}

impl ReportService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn paid_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<(i64, u64)> {
        let (total, count) = invoices::Entity::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(amount), 0)::BIGINT"), "total")
            .column_as(Expr::cust("COUNT(*)"), "invoice_count")
            .filter(invoices::Column::Status.eq(InvoiceStatus::Paid))
            .filter(invoices::Column::IssuedOn.between(start, end))
            .into_tuple::<(i64, i64)>()
            .one(&self.pool)
            .await?
            .unwrap_or((0, 0));
        Ok((total, count.max(0) as u64))
    }

    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let today = Local::now().date_naive();

        let active_clients = members::Entity::find()
            .filter(members::Column::RoleId.eq(Role::Client.id()))
            .filter(members::Column::IsActive.eq(true))
            .count(&self.pool)
            .await?;
        let trainers = members::Entity::find()
            .filter(members::Column::RoleId.eq(Role::Trainer.id()))
            .count(&self.pool)
            .await?;
        let active_classes = classes::Entity::find()
            .filter(classes::Column::IsActive.eq(true))
            .count(&self.pool)
            .await?;

        let (first, last) = month_bounds(today);
        let (monthly_income, _) = self.paid_between(first, last).await?;

        let (start, end) = day_bounds(today);
        let today_attendance = attendance::Entity::find()
            .filter(attendance::Column::EntryAt.gte(start))
            .filter(attendance::Column::EntryAt.lt(end))
            .count(&self.pool)
            .await?;

        Ok(DashboardStats {
            active_clients,
            trainers,
            active_classes,
            monthly_income,
            today_attendance,
        })
    }

    pub async fn income(&self, query: DateRangeQuery) -> AppResult<IncomeReport> {
        let (start, end) = resolve_range(query, Local::now().date_naive())?;
        let (total, invoice_count) = self.paid_between(start, end).await?;
        Ok(IncomeReport {
            start,
            end,
            total,
            invoice_count,
        })
    }

    pub async fn daily_attendance(&self, query: DateRangeQuery) -> AppResult<Vec<DailyAttendance>> {
        let (start, end) = resolve_range(query, Local::now().date_naive())?;
        let (from, _) = day_bounds(start);
        let (_, until) = day_bounds(end);

        let rows = daily_counts(from, until)
            .into_tuple::<(NaiveDate, i64)>()
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(date, count)| DailyAttendance {
                date,
                count: count.max(0) as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(date(2025, 2, 14)), (date(2025, 2, 1), date(2025, 2, 28)));
        assert_eq!(month_bounds(date(2024, 2, 29)), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(month_bounds(date(2025, 12, 31)), (date(2025, 12, 1), date(2025, 12, 31)));
    }

    #[test]
    fn test_range_defaults_to_current_month() {
        let (start, end) = resolve_range(DateRangeQuery::default(), date(2025, 4, 9)).unwrap();
        assert_eq!(start, date(2025, 4, 1));
        assert_eq!(end, date(2025, 4, 30));
    }

    #[test]
    fn test_daily_counts_group_by_utc_day() {
        let (from, _) = day_bounds(date(2025, 4, 1));
        let (_, until) = day_bounds(date(2025, 4, 2));
        let sql = daily_counts(from, until)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"GROUP BY DATE(entry_at AT TIME ZONE 'UTC')"#));
        assert!(sql.contains(r#"SELECT DATE(entry_at AT TIME ZONE 'UTC') AS "day""#));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let query = DateRangeQuery {
            start: Some(date(2025, 4, 9)),
            end: Some(date(2025, 4, 1)),
        };
        assert!(matches!(
            resolve_range(query, date(2025, 4, 9)),
            Err(AppError::ValidationError(_))
        ));
    }
}
