use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 visitor_stats 表
        manager
            .create_table(
                Table::create()
                    .table(VisitorStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisitorStats::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VisitorStats::Scope)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VisitorStats::TotalVisitors)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(VisitorStats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // scope 唯一索引：保证全局计数器只有一行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_visitor_stats_scope")
                    .table(VisitorStats::Table)
                    .col(VisitorStats::Scope)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_visitor_stats_scope").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(VisitorStats::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VisitorStats {
    #[sea_orm(iden = "visitor_stats")]
    Table,
    Id,
    Scope,
    TotalVisitors,
    UpdatedAt,
}
