use crate::entities::{
    AssignmentStatus, RoutineLevel, exercise_entity as exercises, member_entity as members,
    routine_assignment_entity as assignments, routine_day_entity as routine_days,
    routine_entity as routines, routine_exercise_entity as routine_exercises,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{Local, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

const DEFAULT_REST_SECONDS: i32 = 60;

#[derive(Clone)]
pub struct RoutineService {
    pool: DatabaseConnection,
}

fn validate_days(days: &[RoutineDayInput]) -> AppResult<()> {
    for day in days {
        if day.name.trim().is_empty() {
            return Err(AppError::ValidationError("Day name is required".to_string()));
        }
        for entry in &day.exercises {
            if entry.sets <= 0 {
                return Err(AppError::ValidationError(
                    "Sets must be greater than zero".to_string(),
                ));
            }
            if entry.reps.trim().is_empty() {
                return Err(AppError::ValidationError("Reps are required".to_string()));
            }
            if entry.rest_seconds.is_some_and(|r| r < 0) {
                return Err(AppError::ValidationError(
                    "Rest must not be negative".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Inserts one day and its entries; positions fall back to list order.
async fn insert_day<C: ConnectionTrait>(
    db: &C,
    routine_id: i64,
    day: RoutineDayInput,
    fallback_position: i32,
) -> AppResult<routine_days::Model> {
    let stored = routine_days::ActiveModel {
        routine_id: Set(routine_id),
        name: Set(day.name.trim().to_string()),
        description: Set(day.description),
        position: Set(day.position.unwrap_or(fallback_position)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (index, entry) in day.exercises.into_iter().enumerate() {
        routine_exercises::ActiveModel {
            routine_day_id: Set(stored.id),
            exercise_id: Set(entry.exercise_id),
            sets: Set(entry.sets),
            reps: Set(entry.reps.trim().to_string()),
            weight: Set(entry.weight),
            rest_seconds: Set(entry.rest_seconds.unwrap_or(DEFAULT_REST_SECONDS)),
            position: Set(entry.position.unwrap_or(index as i32 + 1)),
            notes: Set(entry.notes),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(stored)
}

impl From<RoutineDayDetail> for RoutineDayInput {
    fn from(day: RoutineDayDetail) -> Self {
        Self {
            name: day.name,
            description: day.description,
            position: Some(day.position),
            exercises: day
                .exercises
                .into_iter()
                .map(|e| RoutineExerciseInput {
                    exercise_id: e.exercise_id,
                    sets: e.sets,
                    reps: e.reps,
                    weight: e.weight,
                    rest_seconds: Some(e.rest_seconds),
                    position: Some(e.position),
                    notes: e.notes,
                })
                .collect(),
        }
    }
}

impl RoutineService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    async fn find_routine(&self, id: i64) -> AppResult<routines::Model> {
        routines::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))
    }

    async fn ensure_exercises_exist(&self, days: &[RoutineDayInput]) -> AppResult<()> {
        let mut ids: Vec<i64> = days
            .iter()
            .flat_map(|d| d.exercises.iter().map(|e| e.exercise_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }

        let found = exercises::Entity::find()
            .filter(exercises::Column::Id.is_in(ids.clone()))
            .count(&self.pool)
            .await?;
        if found != ids.len() as u64 {
            return Err(AppError::ValidationError(
                "Routine references an unknown exercise".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn list_routines(&self) -> AppResult<Vec<routines::Model>> {
        Ok(routines::Entity::find()
            .order_by_asc(routines::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn get_routine(&self, id: i64) -> AppResult<RoutineDetail> {
        let routine = self.find_routine(id).await?;

        let days = routine_days::Entity::find()
            .filter(routine_days::Column::RoutineId.eq(id))
            .order_by_asc(routine_days::Column::Position)
            .order_by_asc(routine_days::Column::Id)
            .all(&self.pool)
            .await?;
        let day_ids: Vec<i64> = days.iter().map(|d| d.id).collect();

        let entries = if day_ids.is_empty() {
            Vec::new()
        } else {
            routine_exercises::Entity::find()
                .filter(routine_exercises::Column::RoutineDayId.is_in(day_ids))
                .order_by_asc(routine_exercises::Column::Position)
                .order_by_asc(routine_exercises::Column::Id)
                .all(&self.pool)
                .await?
        };

        let exercise_ids: Vec<i64> = entries.iter().map(|e| e.exercise_id).collect();
        let names: HashMap<i64, String> = if exercise_ids.is_empty() {
            HashMap::new()
        } else {
            exercises::Entity::find()
                .filter(exercises::Column::Id.is_in(exercise_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|e| (e.id, e.name))
                .collect()
        };

        let mut by_day: HashMap<i64, Vec<RoutineExerciseDetail>> = HashMap::new();
        for entry in entries {
            by_day
                .entry(entry.routine_day_id)
                .or_default()
                .push(RoutineExerciseDetail {
                    id: entry.id,
                    exercise_id: entry.exercise_id,
                    exercise_name: names.get(&entry.exercise_id).cloned(),
                    sets: entry.sets,
                    reps: entry.reps,
                    weight: entry.weight,
                    rest_seconds: entry.rest_seconds,
                    position: entry.position,
                    notes: entry.notes,
                });
        }

        let days = days
            .into_iter()
            .map(|day| RoutineDayDetail {
                exercises: by_day.remove(&day.id).unwrap_or_default(),
                id: day.id,
                name: day.name,
                description: day.description,
                position: day.position,
            })
            .collect();

        Ok(RoutineDetail { routine, days })
    }

    /// Creates the routine with all of its days and entries in one transaction.
    pub async fn create_routine(
        &self,
        request: CreateRoutineRequest,
        trainer_id: Option<i64>,
    ) -> AppResult<RoutineDetail> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        if request.duration_weeks.is_some_and(|w| w <= 0) {
            return Err(AppError::ValidationError(
                "Duration must be greater than zero".to_string(),
            ));
        }
        validate_days(&request.days)?;
        self.ensure_exercises_exist(&request.days).await?;

        let txn = self.pool.begin().await?;
        let routine = routines::ActiveModel {
            name: Set(name),
            description: Set(request.description),
            duration_weeks: Set(request.duration_weeks),
            level: Set(request.level.unwrap_or(RoutineLevel::Beginner)),
            goal: Set(request.goal),
            trainer_id: Set(trainer_id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (index, day) in request.days.into_iter().enumerate() {
            insert_day(&txn, routine.id, day, index as i32 + 1).await?;
        }
        txn.commit().await?;

        log::info!("Routine {} created", routine.id);
        self.get_routine(routine.id).await
    }

    pub async fn update_routine(
        &self,
        id: i64,
        request: UpdateRoutineRequest,
    ) -> AppResult<routines::Model> {
        let mut routine = self.find_routine(id).await?.into_active_model();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::ValidationError("Name is required".to_string()));
            }
            routine.name = Set(name);
        }
        if let Some(weeks) = request.duration_weeks {
            if weeks <= 0 {
                return Err(AppError::ValidationError(
                    "Duration must be greater than zero".to_string(),
                ));
            }
            routine.duration_weeks = Set(Some(weeks));
        }
        if let Some(level) = request.level {
            routine.level = Set(level);
        }
        if request.description.is_some() {
            routine.description = Set(request.description);
        }
        if request.goal.is_some() {
            routine.goal = Set(request.goal);
        }

        Ok(routine.update(&self.pool).await?)
    }

    /// Removes entries, days, assignments and the routine together.
    pub async fn delete_routine(&self, id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        if routines::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound("Routine not found".to_string()));
        }

        let day_ids: Vec<i64> = routine_days::Entity::find()
            .filter(routine_days::Column::RoutineId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();
        if !day_ids.is_empty() {
            routine_exercises::Entity::delete_many()
                .filter(routine_exercises::Column::RoutineDayId.is_in(day_ids))
                .exec(&txn)
                .await?;
        }
        routine_days::Entity::delete_many()
            .filter(routine_days::Column::RoutineId.eq(id))
            .exec(&txn)
            .await?;
        assignments::Entity::delete_many()
            .filter(assignments::Column::RoutineId.eq(id))
            .exec(&txn)
            .await?;
        routines::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Routine {id} deleted");
        Ok(())
    }

    pub async fn add_day(&self, routine_id: i64, day: RoutineDayInput) -> AppResult<RoutineDetail> {
        validate_days(std::slice::from_ref(&day))?;
        self.find_routine(routine_id).await?;
        self.ensure_exercises_exist(std::slice::from_ref(&day)).await?;

        let txn = self.pool.begin().await?;
        let existing = routine_days::Entity::find()
            .filter(routine_days::Column::RoutineId.eq(routine_id))
            .count(&txn)
            .await?;
        insert_day(&txn, routine_id, day, existing as i32 + 1).await?;
        txn.commit().await?;

        self.get_routine(routine_id).await
    }

    /// Deep copy of a routine, its days and entries. Assignments are not copied.
    pub async fn duplicate_routine(&self, id: i64, trainer_id: Option<i64>) -> AppResult<RoutineDetail> {
        let source = self.get_routine(id).await?;

        let txn = self.pool.begin().await?;
        let copy = routines::ActiveModel {
            name: Set(format!("{} (copy)", source.routine.name)),
            description: Set(source.routine.description),
            duration_weeks: Set(source.routine.duration_weeks),
            level: Set(source.routine.level),
            goal: Set(source.routine.goal),
            trainer_id: Set(trainer_id.or(source.routine.trainer_id)),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (index, day) in source.days.into_iter().enumerate() {
            insert_day(&txn, copy.id, day.into(), index as i32 + 1).await?;
        }
        txn.commit().await?;

        log::info!("Routine {id} duplicated as {}", copy.id);
        self.get_routine(copy.id).await
    }

    async fn active_assignment(
        &self,
        routine_id: i64,
        member_id: i64,
        except: Option<i64>,
    ) -> AppResult<Option<assignments::Model>> {
        let mut select = assignments::Entity::find()
            .filter(assignments::Column::RoutineId.eq(routine_id))
            .filter(assignments::Column::MemberId.eq(member_id))
            .filter(assignments::Column::Status.eq(AssignmentStatus::Active));
        if let Some(id) = except {
            select = select.filter(assignments::Column::Id.ne(id));
        }
        Ok(select.one(&self.pool).await?)
    }

    /// A routine is actively assigned to a given client at most once.
    pub async fn assign_routine(
        &self,
        routine_id: i64,
        request: AssignRoutineRequest,
        assigned_by: Option<i64>,
    ) -> AppResult<assignments::Model> {
        let start_date = request
            .start_date
            .unwrap_or_else(|| Local::now().date_naive());
        if request.end_date.is_some_and(|end| end < start_date) {
            return Err(AppError::ValidationError(
                "End date must not precede start date".to_string(),
            ));
        }

        self.find_routine(routine_id).await?;
        let client = members::Entity::find_by_id(request.client_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
        if client.role_id != Role::Client.id() {
            return Err(AppError::ValidationError(
                "Routines can only be assigned to clients".to_string(),
            ));
        }

        if self
            .active_assignment(routine_id, client.id, None)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Routine is already actively assigned to this client".to_string(),
            ));
        }

        let assignment = assignments::ActiveModel {
            routine_id: Set(routine_id),
            member_id: Set(client.id),
            assigned_by: Set(assigned_by),
            status: Set(AssignmentStatus::Active),
            start_date: Set(start_date),
            end_date: Set(request.end_date),
            notes: Set(request.notes),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Routine {routine_id} assigned to member {} (assignment {})",
            client.id,
            assignment.id
        );
        Ok(assignment)
    }

    pub async fn client_assignments(&self, client_id: i64) -> AppResult<Vec<AssignmentResponse>> {
        let rows = assignments::Entity::find()
            .filter(assignments::Column::MemberId.eq(client_id))
            .order_by_desc(assignments::Column::StartDate)
            .order_by_desc(assignments::Column::Id)
            .all(&self.pool)
            .await?;

        let routine_ids: Vec<i64> = rows.iter().map(|a| a.routine_id).collect();
        let names: HashMap<i64, String> = if routine_ids.is_empty() {
            HashMap::new()
        } else {
            routines::Entity::find()
                .filter(routines::Column::Id.is_in(routine_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|r| (r.id, r.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|a| AssignmentResponse {
                routine_name: names.get(&a.routine_id).cloned(),
                id: a.id,
                routine_id: a.routine_id,
                member_id: a.member_id,
                assigned_by: a.assigned_by,
                status: a.status,
                start_date: a.start_date,
                end_date: a.end_date,
                notes: a.notes,
                created_at: a.created_at,
            })
            .collect())
    }

    async fn find_assignment(&self, id: i64) -> AppResult<assignments::Model> {
        assignments::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
    }

    pub async fn pause_assignment(&self, id: i64) -> AppResult<assignments::Model> {
        let assignment = self.find_assignment(id).await?;
        if assignment.status != AssignmentStatus::Active {
            return Err(AppError::ValidationError(
                "Only active assignments can be paused".to_string(),
            ));
        }
        let mut model = assignment.into_active_model();
        model.status = Set(AssignmentStatus::Paused);
        Ok(model.update(&self.pool).await?)
    }

    pub async fn resume_assignment(&self, id: i64) -> AppResult<assignments::Model> {
        let assignment = self.find_assignment(id).await?;
        if assignment.status != AssignmentStatus::Paused {
            return Err(AppError::ValidationError(
                "Only paused assignments can be resumed".to_string(),
            ));
        }
        if self
            .active_assignment(assignment.routine_id, assignment.member_id, Some(id))
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Routine is already actively assigned to this client".to_string(),
            ));
        }
        let mut model = assignment.into_active_model();
        model.status = Set(AssignmentStatus::Active);
        Ok(model.update(&self.pool).await?)
    }

    pub async fn routine_stats(&self) -> AppResult<RoutineStats> {
        let total_routines = routines::Entity::find().count(&self.pool).await?;
        let mut by_status = Vec::new();
        for status in [
            AssignmentStatus::Active,
            AssignmentStatus::Paused,
            AssignmentStatus::Completed,
            AssignmentStatus::Cancelled,
        ] {
            let count = assignments::Entity::find()
                .filter(assignments::Column::Status.eq(status.clone()))
                .count(&self.pool)
                .await?;
            by_status.push(StatusCount { status, count });
        }
        Ok(RoutineStats {
            total_routines,
            assignments: by_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn routine() -> routines::Model {
        routines::Model {
            id: 5,
            name: "Beginner - Full Body".into(),
            description: None,
            duration_weeks: Some(4),
            level: RoutineLevel::Beginner,
            goal: None,
            trainer_id: Some(2),
            created_at: None,
        }
    }

    fn client(role: Role) -> members::Model {
        members::Model {
            id: 9,
            first_name: "Ana".into(),
            last_name: "Perez".into(),
            email: "ana@gym.com".into(),
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

    fn assignment(status: AssignmentStatus) -> assignments::Model {
        assignments::Model {
            id: 11,
            routine_id: 5,
            member_id: 9,
            assigned_by: Some(2),
            status,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            notes: None,
            created_at: None,
        }
    }

    fn assign_request() -> AssignRoutineRequest {
        AssignRoutineRequest {
            client_id: 9,
            start_date: None,
            end_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_active_assignment_is_conflict_without_insert() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![routine()]])
            .append_query_results([vec![client(Role::Client)]])
            .append_query_results([vec![assignment(AssignmentStatus::Active)]])
            .into_connection();
        let svc = RoutineService::new(pool);

        let err = svc.assign_routine(5, assign_request(), Some(2)).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        // routine, client and active-assignment lookups; nothing written
        assert_eq!(svc.pool.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn test_assign_to_non_client_rejected() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![routine()]])
            .append_query_results([vec![client(Role::Trainer)]])
            .into_connection();
        let svc = RoutineService::new(pool);
        let err = svc.assign_routine(5, assign_request(), None).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_end_before_start_rejected_without_query() {
        let svc = RoutineService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut req = assign_request();
        req.start_date = NaiveDate::from_ymd_opt(2025, 3, 10);
        req.end_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(matches!(
            svc.assign_routine(5, req, None).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_resume_blocked_by_other_active_assignment() {
        let mut other = assignment(AssignmentStatus::Active);
        other.id = 12;
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![assignment(AssignmentStatus::Paused)]])
            .append_query_results([vec![other]])
            .into_connection();
        let svc = RoutineService::new(pool);
        assert!(matches!(
            svc.resume_assignment(11).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_pause_requires_active_assignment() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![assignment(AssignmentStatus::Completed)]])
            .into_connection();
        let svc = RoutineService::new(pool);
        assert!(matches!(
            svc.pause_assignment(11).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_entry_rejected_before_transaction() {
        let svc = RoutineService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let request = CreateRoutineRequest {
            name: "Push Pull Legs".into(),
            description: None,
            duration_weeks: Some(6),
            level: Some(RoutineLevel::Intermediate),
            goal: None,
            days: vec![RoutineDayInput {
                name: "Push".into(),
                description: None,
                position: None,
                exercises: vec![RoutineExerciseInput {
                    exercise_id: 1,
                    sets: 0,
                    reps: "10".into(),
                    weight: None,
                    rest_seconds: None,
                    position: None,
                    notes: None,
                }],
            }],
        };
        assert!(matches!(
            svc.create_routine(request, Some(2)).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[test]
    fn test_detail_day_converts_back_to_input() {
        let day = RoutineDayDetail {
            id: 1,
            name: "Legs".into(),
            description: None,
            position: 3,
            exercises: vec![RoutineExerciseDetail {
                id: 4,
                exercise_id: 7,
                exercise_name: Some("Squat".into()),
                sets: 4,
                reps: "8".into(),
                weight: Some("60kg".into()),
                rest_seconds: 90,
                position: 2,
                notes: None,
            }],
        };
        let input = RoutineDayInput::from(day);
        assert_eq!(input.position, Some(3));
        assert_eq!(input.exercises[0].rest_seconds, Some(90));
        assert_eq!(input.exercises[0].position, Some(2));
    }
}
