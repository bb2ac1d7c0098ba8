use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateExerciseRequest {
    #[schema(example = "Push-up")]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    #[schema(example = "strength")]
    pub exercise_type: Option<String>,
    pub muscle_group: Option<String>,
}
