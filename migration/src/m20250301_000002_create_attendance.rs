use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    MemberId,
    RecordedBy,
    ClassId,
    EntryAt,
    ExitAt,
    Note,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(Attendance::RecordedBy).big_integer().null())
                    .col(ColumnDef::new(Attendance::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(Attendance::EntryAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(ColumnDef::new(Attendance::ExitAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Attendance::Note).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_member")
                            .from(Attendance::Table, Attendance::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_recorded_by")
                            .from(Attendance::Table, Attendance::RecordedBy)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_member_entry")
                    .table(Attendance::Table)
                    .col(Attendance::MemberId)
                    .col(Attendance::EntryAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        Ok(())
    }
}
