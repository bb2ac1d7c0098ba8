use crate::entities::{exercise_category_entity as categories, exercise_entity as exercises};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct ExerciseService {
    pool: DatabaseConnection,
}

impl ExerciseService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> AppResult<Vec<categories::Model>> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn list_exercises(&self) -> AppResult<Vec<exercises::Model>> {
        Ok(exercises::Entity::find()
            .order_by_asc(exercises::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn exercises_by_category(&self, category_id: i64) -> AppResult<Vec<exercises::Model>> {
        Ok(exercises::Entity::find()
            .filter(exercises::Column::CategoryId.eq(category_id))
            .order_by_asc(exercises::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn create_exercise(&self, request: CreateExerciseRequest) -> AppResult<exercises::Model> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        if let Some(category_id) = request.category_id
            && categories::Entity::find_by_id(category_id)
                .one(&self.pool)
                .await?
                .is_none()
        {
            return Err(AppError::NotFound("Exercise category not found".to_string()));
        }

        let exercise = exercises::ActiveModel {
            name: Set(name),
            description: Set(request.description),
            category_id: Set(request.category_id),
            exercise_type: Set(request.exercise_type),
            muscle_group: Set(request.muscle_group),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<categories::Model>::new()])
            .into_connection();
        let svc = ExerciseService::new(pool);
        let err = svc
            .create_exercise(CreateExerciseRequest {
                name: "Push-up".into(),
                description: None,
                category_id: Some(99),
                exercise_type: None,
                muscle_group: Some("chest".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_exercises_listed_in_stored_order() {
        let rows = vec![
            exercises::Model {
                id: 1,
                name: "Deadlift".into(),
                description: None,
                category_id: Some(2),
                exercise_type: Some("strength".into()),
                muscle_group: Some("back".into()),
            },
            exercises::Model {
                id: 2,
                name: "Squat".into(),
                description: None,
                category_id: Some(2),
                exercise_type: Some("strength".into()),
                muscle_group: Some("legs".into()),
            },
        ];
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows.clone()])
            .into_connection();
        let svc = ExerciseService::new(pool);
        assert_eq!(svc.exercises_by_category(2).await.unwrap(), rows);
    }
}
