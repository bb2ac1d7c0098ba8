use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateClassRequest {
    #[schema(example = "Spinning")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "Mon/Wed 18:00")]
    pub schedule: String,
    #[schema(example = 20)]
    pub capacity: i32,
    pub trainer_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub capacity: Option<i32>,
    pub trainer_id: Option<i64>,
    pub is_active: Option<bool>,
}
