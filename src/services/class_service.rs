use crate::entities::{class_entity as classes, member_entity as members};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct ClassService {
    pool: DatabaseConnection,
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if capacity <= 0 {
        return Err(AppError::ValidationError(
            "Capacity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

impl ClassService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn ensure_trainer(&self, trainer_id: i64) -> AppResult<()> {
        let trainer = members::Entity::find_by_id(trainer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))?;
        if trainer.role_id != Role::Trainer.id() {
            return Err(AppError::ValidationError(
                "Assigned member is not a trainer".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn list_classes(&self) -> AppResult<Vec<classes::Model>> {
        Ok(classes::Entity::find()
            .order_by_asc(classes::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn count_active_classes(&self) -> AppResult<u64> {
        Ok(classes::Entity::find()
            .filter(classes::Column::IsActive.eq(true))
            .count(&self.pool)
            .await?)
    }

    pub async fn get_class(&self, id: i64) -> AppResult<classes::Model> {
        classes::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
    }

    pub async fn create_class(&self, request: CreateClassRequest) -> AppResult<classes::Model> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        validate_capacity(request.capacity)?;
        if let Some(trainer_id) = request.trainer_id {
            self.ensure_trainer(trainer_id).await?;
        }

        let class = classes::ActiveModel {
            name: Set(name),
            description: Set(request.description),
            schedule: Set(request.schedule.trim().to_string()),
            capacity: Set(request.capacity),
            trainer_id: Set(request.trainer_id),
            is_active: Set(true),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(class)
    }

    pub async fn update_class(&self, id: i64, request: UpdateClassRequest) -> AppResult<classes::Model> {
        let mut class = self.get_class(id).await?.into_active_model();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::ValidationError("Name is required".to_string()));
            }
            class.name = Set(name);
        }
        if let Some(capacity) = request.capacity {
            validate_capacity(capacity)?;
            class.capacity = Set(capacity);
        }
        if let Some(trainer_id) = request.trainer_id {
            self.ensure_trainer(trainer_id).await?;
            class.trainer_id = Set(Some(trainer_id));
        }
        if let Some(schedule) = request.schedule {
            class.schedule = Set(schedule.trim().to_string());
        }
        if request.description.is_some() {
            class.description = Set(request.description);
        }
        if let Some(is_active) = request.is_active {
            class.is_active = Set(is_active);
        }

        Ok(class.update(&self.pool).await?)
    }

    pub async fn delete_class(&self, id: i64) -> AppResult<()> {
        let result = classes::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Class not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn trainer_candidate(role: Role) -> members::Model {
        members::Model {
            id: 8,
            first_name: "Luis".into(),
            last_name: "Diaz".into(),
            email: "luis@gym.com".into(),
            phone: None,
            password_hash: "hash".into(),
            role_id: role.id(),
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

    fn request(capacity: i32, trainer_id: Option<i64>) -> CreateClassRequest {
        CreateClassRequest {
            name: "Spinning".into(),
            description: None,
            schedule: "Mon 18:00".into(),
            capacity,
            trainer_id,
        }
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected() {
        let svc = ClassService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        assert!(matches!(
            svc.create_class(request(0, None)).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_non_trainer_cannot_lead_class() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![trainer_candidate(Role::Client)]])
            .into_connection();
        let svc = ClassService::new(pool);
        let err = svc.create_class(request(20, Some(8))).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.pool.into_transaction_log().len(), 1);
    }
}
