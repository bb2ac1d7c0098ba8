use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ExerciseCategories {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Exercises {
    Table,
    Id,
    Name,
    Description,
    CategoryId,
    ExerciseType,
    MuscleGroup,
}

#[derive(DeriveIden)]
enum Routines {
    Table,
    Id,
    Name,
    Description,
    DurationWeeks,
    Level,
    Goal,
    TrainerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RoutineDays {
    Table,
    Id,
    RoutineId,
    Name,
    Description,
    Position,
}

#[derive(DeriveIden)]
enum RoutineExercises {
    Table,
    Id,
    RoutineDayId,
    ExerciseId,
    Sets,
    Reps,
    Weight,
    RestSeconds,
    Position,
    Notes,
}

#[derive(DeriveIden)]
enum RoutineAssignments {
    Table,
    Id,
    RoutineId,
    MemberId,
    AssignedBy,
    Status,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("routine_level"))
                    .values(vec![
                        Alias::new("beginner"),
                        Alias::new("intermediate"),
                        Alias::new("advanced"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("assignment_status"))
                    .values(vec![
                        Alias::new("active"),
                        Alias::new("paused"),
                        Alias::new("completed"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExerciseCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExerciseCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExerciseCategories::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ExerciseCategories::Description).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exercises::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exercises::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Exercises::Description).text().null())
                    .col(ColumnDef::new(Exercises::CategoryId).big_integer().null())
                    .col(ColumnDef::new(Exercises::ExerciseType).string_len(50).null())
                    .col(ColumnDef::new(Exercises::MuscleGroup).string_len(100).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exercises_category")
                            .from(Exercises::Table, Exercises::CategoryId)
                            .to(ExerciseCategories::Table, ExerciseCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Routines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Routines::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Routines::Name).string_len(150).not_null())
                    .col(ColumnDef::new(Routines::Description).text().null())
                    .col(ColumnDef::new(Routines::DurationWeeks).integer().null())
                    .col(
                        ColumnDef::new(Routines::Level)
                            .custom(Alias::new("routine_level"))
                            .not_null()
                            .default(Expr::cust("'beginner'")),
                    )
                    .col(ColumnDef::new(Routines::Goal).string_len(50).null())
                    .col(ColumnDef::new(Routines::TrainerId).big_integer().null())
                    .col(
                        ColumnDef::new(Routines::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routines_trainer")
                            .from(Routines::Table, Routines::TrainerId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoutineDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoutineDays::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoutineDays::RoutineId).big_integer().not_null())
                    .col(ColumnDef::new(RoutineDays::Name).string_len(150).not_null())
                    .col(ColumnDef::new(RoutineDays::Description).text().null())
                    .col(ColumnDef::new(RoutineDays::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_days_routine")
                            .from(RoutineDays::Table, RoutineDays::RoutineId)
                            .to(Routines::Table, Routines::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoutineExercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoutineExercises::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoutineExercises::RoutineDayId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoutineExercises::ExerciseId).big_integer().not_null())
                    .col(ColumnDef::new(RoutineExercises::Sets).integer().not_null())
                    .col(ColumnDef::new(RoutineExercises::Reps).string_len(30).not_null())
                    .col(ColumnDef::new(RoutineExercises::Weight).string_len(30).null())
                    .col(
                        ColumnDef::new(RoutineExercises::RestSeconds)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(ColumnDef::new(RoutineExercises::Position).integer().not_null())
                    .col(ColumnDef::new(RoutineExercises::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_exercises_day")
                            .from(RoutineExercises::Table, RoutineExercises::RoutineDayId)
                            .to(RoutineDays::Table, RoutineDays::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_exercises_exercise")
                            .from(RoutineExercises::Table, RoutineExercises::ExerciseId)
                            .to(Exercises::Table, Exercises::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // no unique constraint on (routine_id, member_id, status): the service
        // checks for an existing active assignment before inserting
        manager
            .create_table(
                Table::create()
                    .table(RoutineAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoutineAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoutineAssignments::RoutineId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoutineAssignments::MemberId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoutineAssignments::AssignedBy).big_integer().null())
                    .col(
                        ColumnDef::new(RoutineAssignments::Status)
                            .custom(Alias::new("assignment_status"))
                            .not_null()
                            .default(Expr::cust("'active'")),
                    )
                    .col(
                        ColumnDef::new(RoutineAssignments::StartDate)
                            .date()
                            .not_null()
                            .default(Expr::cust("CURRENT_DATE")),
                    )
                    .col(ColumnDef::new(RoutineAssignments::EndDate).date().null())
                    .col(ColumnDef::new(RoutineAssignments::Notes).text().null())
                    .col(
                        ColumnDef::new(RoutineAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_assignments_routine")
                            .from(RoutineAssignments::Table, RoutineAssignments::RoutineId)
                            .to(Routines::Table, Routines::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_assignments_member")
                            .from(RoutineAssignments::Table, RoutineAssignments::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_routine_assignments_pair")
                    .table(RoutineAssignments::Table)
                    .col(RoutineAssignments::RoutineId)
                    .col(RoutineAssignments::MemberId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoutineAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoutineExercises::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoutineDays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Routines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExerciseCategories::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("assignment_status")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("routine_level")).to_owned())
            .await?;
        Ok(())
    }
}
