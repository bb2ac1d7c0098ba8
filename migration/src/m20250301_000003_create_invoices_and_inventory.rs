use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    MemberId,
    IssuedOn,
    Amount,
    Category,
    Status,
    PaymentMethod,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    Name,
    Category,
    Quantity,
    Status,
    Supplier,
    Location,
    UnitPrice,
    Description,
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
                    .as_enum(Alias::new("invoice_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("paid"),
                        Alias::new("cancelled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::MemberId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Invoices::IssuedOn)
                            .date()
                            .not_null()
                            .default(Expr::cust("CURRENT_DATE")),
                    )
                    .col(ColumnDef::new(Invoices::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Invoices::Category).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Invoices::Status)
                            .custom(Alias::new("invoice_status"))
                            .not_null()
                            .default(Expr::cust("'pending'")),
                    )
                    .col(ColumnDef::new(Invoices::PaymentMethod).string_len(50).null())
                    .col(ColumnDef::new(Invoices::Notes).text().null())
                    .col(
                        ColumnDef::new(Invoices::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_member")
                            .from(Invoices::Table, Invoices::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryItems::Name).string_len(150).not_null())
                    .col(ColumnDef::new(InventoryItems::Category).string_len(100).not_null())
                    .col(
                        ColumnDef::new(InventoryItems::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::Status)
                            .string_len(50)
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(InventoryItems::Supplier).string_len(150).null())
                    .col(ColumnDef::new(InventoryItems::Location).string_len(150).null())
                    .col(
                        ColumnDef::new(InventoryItems::UnitPrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(InventoryItems::Description).text().null())
                    .col(
                        ColumnDef::new(InventoryItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("invoice_status")).to_owned())
            .await?;
        Ok(())
    }
}
