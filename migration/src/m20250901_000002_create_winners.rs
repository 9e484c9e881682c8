use sea_orm_migration::prelude::*;

/// Draw history (抽奖历史)
/// - person_name 冗余存储中奖时的姓名快照
/// - 无外键: 删除成员后历史记录仍保留
#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    PersonId,
    PersonName,
    WonAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Winners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Winners::PersonId).integer().not_null())
                    .col(ColumnDef::new(Winners::PersonName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Winners::WonAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Winners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 历史记录按时间倒序查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winners_won_at")
                    .table(Winners::Table)
                    .col(Winners::WonAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_winners_person_id")
                    .table(Winners::Table)
                    .col(Winners::PersonId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Winners::Table).to_owned())
            .await
    }
}
