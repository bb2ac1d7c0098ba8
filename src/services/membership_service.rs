use crate::entities::member_entity as members;
use crate::error::AppResult;
use crate::models::Role;
use chrono::{Local, NaiveDate};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[derive(Clone)]
pub struct MembershipService {
    pool: DatabaseConnection,
}

impl MembershipService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Deactivates clients whose membership ended before `today`.
    ///
    /// Only the active flag is written, and only on rows that are still
    /// active, so running it again without intervening changes affects
    /// nothing.
    pub async fn expire_memberships_on(&self, today: NaiveDate) -> AppResult<u64> {
        let result = members::Entity::update_many()
            .col_expr(members::Column::IsActive, Expr::value(false))
            .filter(members::Column::RoleId.eq(Role::Client.id()))
            .filter(members::Column::MembershipEnd.lt(today))
            .filter(members::Column::IsActive.eq(true))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn expire_memberships(&self) -> AppResult<u64> {
        self.expire_memberships_on(Local::now().date_naive()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn sweep_statement(today: NaiveDate) -> Transaction {
        Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE "members" SET "is_active" = $1 WHERE "members"."role_id" = $2 AND "members"."membership_end" < $3 AND "members"."is_active" = $4"#,
            [false.into(), 4i32.into(), today.into(), true.into()],
        )
    }

    #[tokio::test]
    async fn test_sweep_only_touches_active_clients() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();
        let svc = MembershipService::new(pool);
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        assert_eq!(svc.expire_memberships_on(today).await.unwrap(), 3);
        assert_eq!(svc.pool.into_transaction_log(), [sweep_statement(today)]);
    }

    #[tokio::test]
    async fn test_second_sweep_issues_same_guarded_update() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let svc = MembershipService::new(pool);
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        assert_eq!(svc.expire_memberships_on(today).await.unwrap(), 3);
        assert_eq!(svc.expire_memberships_on(today).await.unwrap(), 0);

        // the already-deactivated rows are excluded by the is_active filter
        assert_eq!(
            svc.pool.into_transaction_log(),
            [sweep_statement(today), sweep_statement(today)]
        );
    }
}
