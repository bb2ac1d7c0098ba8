use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    PasswordHash,
    RoleId,
    Gender,
    Address,
    City,
    MembershipType,
    MembershipStart,
    MembershipEnd,
    IsActive,
    MedicalConditions,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Roles::Name).string_len(30).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // fixed role ids, referenced by literal from the application
        let seed = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Id, Roles::Name])
            .values_panic([1.into(), "admin".into()])
            .values_panic([2.into(), "trainer".into()])
            .values_panic([3.into(), "receptionist".into()])
            .values_panic([4.into(), "client".into()])
            .on_conflict(OnConflict::column(Roles::Id).do_nothing().to_owned())
            .to_owned();
        manager.exec_stmt(seed).await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Members::LastName).string_len(100).not_null().default(""))
                    .col(
                        ColumnDef::new(Members::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Members::Phone).string_len(30).null())
                    .col(ColumnDef::new(Members::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Members::RoleId).integer().not_null().default(4))
                    .col(ColumnDef::new(Members::Gender).string_len(20).null())
                    .col(ColumnDef::new(Members::Address).string_len(255).null())
                    .col(ColumnDef::new(Members::City).string_len(100).null())
                    .col(ColumnDef::new(Members::MembershipType).string_len(50).null())
                    .col(ColumnDef::new(Members::MembershipStart).date().null())
                    .col(ColumnDef::new(Members::MembershipEnd).date().null())
                    .col(
                        ColumnDef::new(Members::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Members::MedicalConditions).text().null())
                    .col(ColumnDef::new(Members::Notes).text().null())
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Members::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_role")
                            .from(Members::Table, Members::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // the expiry sweep scans by role and end date
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_members_role_membership_end")
                    .table(Members::Table)
                    .col(Members::RoleId)
                    .col(Members::MembershipEnd)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}
