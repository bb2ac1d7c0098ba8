use crate::entities::{AssignmentStatus, RoutineLevel, routine_entity as routines};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineExerciseInput {
    pub exercise_id: i64,
    #[schema(example = 3)]
    pub sets: i32,
    #[schema(example = "8-12")]
    pub reps: String,
    pub weight: Option<String>,
    /// Defaults to 60 seconds.
    pub rest_seconds: Option<i32>,
    /// Defaults to the entry's index in the list, starting at 1.
    pub position: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineDayInput {
    #[schema(example = "Day 1 - Push")]
    pub name: String,
    pub description: Option<String>,
    pub position: Option<i32>,
    #[serde(default)]
    pub exercises: Vec<RoutineExerciseInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRoutineRequest {
    #[schema(example = "Beginner - Full Body")]
    pub name: String,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub level: Option<RoutineLevel>,
    pub goal: Option<String>,
    #[serde(default)]
    pub days: Vec<RoutineDayInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoutineRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub level: Option<RoutineLevel>,
    pub goal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineExerciseDetail {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise_name: Option<String>,
    pub sets: i32,
    pub reps: String,
    pub weight: Option<String>,
    pub rest_seconds: i32,
    pub position: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineDayDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub exercises: Vec<RoutineExerciseDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoutineDetail {
    #[serde(flatten)]
    #[schema(inline)]
    pub routine: routines::Model,
    pub days: Vec<RoutineDayDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignRoutineRequest {
    pub client_id: i64,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponse {
    pub id: i64,
    pub routine_id: i64,
    pub routine_name: Option<String>,
    pub member_id: i64,
    pub assigned_by: Option<i64>,
    pub status: AssignmentStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCount {
    pub status: AssignmentStatus,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoutineStats {
    pub total_routines: u64,
    pub assignments: Vec<StatusCount>,
}
