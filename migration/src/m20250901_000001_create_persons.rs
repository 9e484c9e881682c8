use sea_orm_migration::prelude::*;

/// Roster members
#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
    Name,
    Present,
    WinCount,
    LastWin,
    LastWinReset,
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
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Persons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Persons::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Persons::Present)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Persons::WinCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Persons::LastWin).timestamp_with_time_zone())
                    .col(ColumnDef::new(Persons::LastWinReset).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Persons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Persons::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 抽奖时按出席状态筛选
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_persons_present")
                    .table(Persons::Table)
                    .col(Persons::Present)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await
    }
}
