use crate::entities::member_entity as members;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::{Duration, Local, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};

#[derive(Clone)]
pub struct MemberService {
    pool: DatabaseConnection,
}

fn parse_role(raw: &str) -> AppResult<Role> {
    raw.parse::<Role>().map_err(AppError::ValidationError)
}

fn medical_text(value: Option<serde_json::Value>) -> AppResult<Option<String>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(v) => Ok(Some(serde_json::to_string(&v)?)),
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(value.to_string())
}

impl MemberService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    fn filtered(role: Option<&str>, q: Option<&str>) -> AppResult<Select<members::Entity>> {
        let mut select = members::Entity::find();
        if let Some(role) = role.filter(|r| !r.trim().is_empty()) {
            select = select.filter(members::Column::RoleId.eq(parse_role(role)?.id()));
        }
        if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", q.to_lowercase());
            let lower = |col: members::Column| Expr::expr(Func::lower(Expr::col(col)));
            select = select.filter(
                Condition::any()
                    .add(lower(members::Column::FirstName).like(pattern.as_str()))
                    .add(lower(members::Column::LastName).like(pattern.as_str()))
                    .add(lower(members::Column::Email).like(pattern.as_str())),
            );
        }
        Ok(select)
    }

    pub async fn list_members(&self, query: MemberQuery) -> AppResult<PaginatedResponse<MemberResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let paginator = Self::filtered(query.role.as_deref(), query.q.as_deref())?
            .order_by_asc(members::Column::LastName)
            .order_by_asc(members::Column::FirstName)
            .paginate(&self.pool, params.get_limit() as u64);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page((params.get_page() - 1) as u64).await?;
        let data = rows.into_iter().map(MemberResponse::from).collect();
        Ok(PaginatedResponse::from_params(data, &params, total as i64))
    }

    pub async fn count_members(&self, role: Option<&str>) -> AppResult<u64> {
        Ok(Self::filtered(role, None)?.count(&self.pool).await?)
    }

    pub async fn active_members(&self) -> AppResult<Vec<MemberResponse>> {
        let rows = members::Entity::find()
            .filter(members::Column::IsActive.eq(true))
            .order_by_asc(members::Column::LastName)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MemberResponse::from).collect())
    }

    /// Active members whose membership ends within the next `days` days.
    pub async fn expiring_members(&self, days: i64) -> AppResult<Vec<MemberResponse>> {
        if !(0..=365).contains(&days) {
            return Err(AppError::ValidationError(
                "days must be between 0 and 365".to_string(),
            ));
        }
        let today = Local::now().date_naive();
        let rows = members::Entity::find()
            .filter(members::Column::IsActive.eq(true))
            .filter(members::Column::MembershipEnd.between(today, today + Duration::days(days)))
            .order_by_asc(members::Column::MembershipEnd)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MemberResponse::from).collect())
    }

    pub async fn member_stats(&self) -> AppResult<MemberStats> {
        let total = members::Entity::find().count(&self.pool).await?;
        let active = members::Entity::find()
            .filter(members::Column::IsActive.eq(true))
            .count(&self.pool)
            .await?;

        let mut by_role = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            let count = members::Entity::find()
                .filter(members::Column::RoleId.eq(role.id()))
                .count(&self.pool)
                .await?;
            by_role.push(RoleCount { role, count });
        }

        Ok(MemberStats {
            total,
            active,
            inactive: total.saturating_sub(active),
            by_role,
        })
    }

    pub async fn find_member(&self, id: i64) -> AppResult<members::Model> {
        members::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    pub async fn get_member(&self, id: i64) -> AppResult<MemberResponse> {
        Ok(MemberResponse::from(self.find_member(id).await?))
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i64>) -> AppResult<()> {
        let mut select = members::Entity::find().filter(members::Column::Email.eq(email));
        if let Some(id) = except {
            select = select.filter(members::Column::Id.ne(id));
        }
        if select.one(&self.pool).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        Ok(())
    }

    pub async fn create_member(&self, request: CreateMemberRequest) -> AppResult<MemberResponse> {
        // everything checkable without the database is checked first
        let first_name = required("First name", &request.first_name)?;
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        let password = match request.password.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => {
                validate_password(p)?;
                p.to_string()
            }
            None => default_password_for(&email),
        };
        let medical_conditions = medical_text(request.medical_conditions)?;
        if let (Some(start), Some(end)) = (request.membership_start, request.membership_end)
            && end < start
        {
            return Err(AppError::ValidationError(
                "Membership end must not precede its start".to_string(),
            ));
        }

        self.ensure_email_free(&email, None).await?;

        let now = Utc::now();
        let member = members::ActiveModel {
            first_name: Set(first_name),
            last_name: Set(request.last_name.unwrap_or_default().trim().to_string()),
            email: Set(email),
            phone: Set(request.phone),
            password_hash: Set(hash_password(&password)?),
            role_id: Set(request.role.unwrap_or(Role::Client).id()),
            gender: Set(request.gender),
            address: Set(request.address),
            city: Set(request.city),
            membership_type: Set(request.membership_type),
            membership_start: Set(request.membership_start),
            membership_end: Set(request.membership_end),
            is_active: Set(request.is_active.unwrap_or(true)),
            medical_conditions: Set(medical_conditions),
            notes: Set(request.notes),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Member {} created", member.id);
        Ok(MemberResponse::from(member))
    }

    /// Creates the configured administrator when the database has none yet.
    /// Returns whether an account was inserted.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<bool> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        let existing = members::Entity::find()
            .filter(members::Column::RoleId.eq(Role::Admin.id()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let admin = self
            .create_member(CreateMemberRequest {
                first_name: "Admin".to_string(),
                last_name: None,
                email,
                password: Some(password.to_string()),
                phone: None,
                role: Some(Role::Admin),
                gender: None,
                address: None,
                city: None,
                membership_type: None,
                membership_start: None,
                membership_end: None,
                is_active: Some(true),
                medical_conditions: None,
                notes: None,
            })
            .await?;
        log::info!("Bootstrap administrator {} created", admin.id);
        Ok(true)
    }

    pub async fn update_member(
        &self,
        id: i64,
        request: UpdateMemberRequest,
    ) -> AppResult<MemberResponse> {
        let existing = self.find_member(id).await?;
        let mut member = existing.clone().into_active_model();

        if let Some(first_name) = request.first_name {
            member.first_name = Set(required("First name", &first_name)?);
        }
        if let Some(last_name) = request.last_name {
            member.last_name = Set(last_name.trim().to_string());
        }
        if let Some(email) = request.email {
            let email = normalize_email(&email);
            validate_email(&email)?;
            if email != existing.email {
                self.ensure_email_free(&email, Some(id)).await?;
            }
            member.email = Set(email);
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            validate_password(&password)?;
            member.password_hash = Set(hash_password(&password)?);
        }
        if let Some(role) = request.role {
            member.role_id = Set(role.id());
        }
        if request.phone.is_some() {
            member.phone = Set(request.phone);
        }
        if request.gender.is_some() {
            member.gender = Set(request.gender);
        }
        if request.address.is_some() {
            member.address = Set(request.address);
        }
        if request.city.is_some() {
            member.city = Set(request.city);
        }
        if request.membership_type.is_some() {
            member.membership_type = Set(request.membership_type);
        }
        if request.membership_start.is_some() {
            member.membership_start = Set(request.membership_start);
        }
        if request.membership_end.is_some() {
            member.membership_end = Set(request.membership_end);
        }
        if let Some(is_active) = request.is_active {
            member.is_active = Set(is_active);
        }
        if request.medical_conditions.is_some() {
            member.medical_conditions = Set(medical_text(request.medical_conditions)?);
        }
        if request.notes.is_some() {
            member.notes = Set(request.notes);
        }
        member.updated_at = Set(Some(Utc::now()));

        let updated = member.update(&self.pool).await?;
        Ok(MemberResponse::from(updated))
    }

    pub async fn delete_member(&self, id: i64) -> AppResult<()> {
        let result = members::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Member not found".to_string()));
        }
        log::info!("Member {id} deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn empty_service() -> MemberService {
        MemberService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_request(email: &str) -> CreateMemberRequest {
        CreateMemberRequest {
            first_name: "Maria".into(),
            last_name: Some("Lopez".into()),
            email: email.into(),
            password: Some("secret1".into()),
            phone: None,
            role: None,
            gender: None,
            address: None,
            city: None,
            membership_type: None,
            membership_start: None,
            membership_end: None,
            is_active: None,
            medical_conditions: None,
            notes: None,
        }
    }

    fn stored(email: &str) -> members::Model {
        members::Model {
            id: 3,
            first_name: "Maria".into(),
            last_name: "Lopez".into(),
            email: email.into(),
            phone: None,
            password_hash: "hash".into(),
            role_id: Role::Client.id(),
            gender: None,
            address: None,
            city: None,
            membership_type: None,
            membership_start: None,
            membership_end: None,
            is_active: true,
            medical_conditions: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_email_without_at_sign_never_reaches_database() {
        let svc = empty_service();
        let err = svc
            .create_member(create_request("maria.gym.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_blank_first_name_rejected() {
        let svc = empty_service();
        let mut req = create_request("maria@gym.com");
        req.first_name = "   ".into();
        let err = svc.create_member(req).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored("maria@gym.com")]])
            .into_connection();
        let svc = MemberService::new(pool);
        let err = svc
            .create_member(create_request("Maria@Gym.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // only the lookup ran
        assert_eq!(svc.pool.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role_filter_rejected() {
        let svc = empty_service();
        let err = svc.count_members(Some("janitor")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_member_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let svc = MemberService::new(pool);
        assert!(matches!(
            svc.delete_member(99).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_inserts_when_none_exists() {
        let mut admin = stored("admin@gym.com");
        admin.id = 1;
        admin.role_id = Role::Admin.id();
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<members::Model>::new()])
            .append_query_results([Vec::<members::Model>::new()])
            .append_query_results([vec![admin]])
            .into_connection();
        let svc = MemberService::new(pool);

        assert!(svc.ensure_admin(" Admin@Gym.com ", "admin123").await.unwrap());
        // admin lookup, email check, insert
        assert_eq!(svc.pool.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn test_ensure_admin_skips_when_admin_exists() {
        let mut admin = stored("owner@gym.com");
        admin.role_id = Role::Admin.id();
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .into_connection();
        let svc = MemberService::new(pool);

        assert!(!svc.ensure_admin("admin@gym.com", "admin123").await.unwrap());
        assert_eq!(svc.pool.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_rejects_short_password_before_database() {
        let svc = empty_service();
        let err = svc.ensure_admin("admin@gym.com", "abc").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[test]
    fn test_medical_text_serializes_objects() {
        let value = serde_json::json!({"asthma": true});
        assert_eq!(
            medical_text(Some(value)).unwrap().as_deref(),
            Some(r#"{"asthma":true}"#)
        );
        assert_eq!(medical_text(Some(serde_json::Value::Null)).unwrap(), None);
    }
}
