use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PnlRecord {
    Table,
    Id,
    EmployeeId,
    Year,
    AttributedRevenue,
    TotalCost,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PnlRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PnlRecord::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PnlRecord::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(PnlRecord::Year).integer().not_null())
                    .col(
                        ColumnDef::new(PnlRecord::AttributedRevenue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PnlRecord::TotalCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PnlRecord::Notes).text())
                    .col(
                        ColumnDef::new(PnlRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PnlRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pnl_record_employee")
                            .from(PnlRecord::Table, PnlRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One ledger row per employee and year; upserts key on this.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pnl_record_employee_year")
                    .table(PnlRecord::Table)
                    .col(PnlRecord::EmployeeId)
                    .col(PnlRecord::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pnl_record_employee")
                    .table(PnlRecord::Table)
                    .col(PnlRecord::EmployeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PnlRecord::Table).to_owned())
            .await?;
        Ok(())
    }
}
