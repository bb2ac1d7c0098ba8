use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "routine_exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub routine_day_id: i64,
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: String,
    pub weight: Option<String>,
    pub rest_seconds: i32,
    pub position: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
