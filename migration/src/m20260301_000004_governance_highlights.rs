use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GovernanceHighlight::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GovernanceHighlight::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GovernanceHighlight::Title).string().not_null())
                    .col(
                        ColumnDef::new(GovernanceHighlight::Category)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GovernanceHighlight::State).string().not_null())
                    .col(ColumnDef::new(GovernanceHighlight::District).string().null())
                    .col(ColumnDef::new(GovernanceHighlight::Locality).string().null())
                    .col(
                        ColumnDef::new(GovernanceHighlight::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GovernanceHighlight::Description)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GovernanceHighlight::SourceName).string().null())
                    .col(ColumnDef::new(GovernanceHighlight::SourceUrl).text().null())
                    .col(
                        ColumnDef::new(GovernanceHighlight::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GovernanceHighlight::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GovernanceHighlight::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GovernanceHighlight::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GovernanceHighlight::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_highlights_category_state")
                    .table(GovernanceHighlight::Table)
                    .col(GovernanceHighlight::Category)
                    .col(GovernanceHighlight::State)
                    .to_owned(),
            )
            .await?;

        // 公开列表只查可见记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_highlights_visible_created")
                    .table(GovernanceHighlight::Table)
                    .col(GovernanceHighlight::IsVisible)
                    .col(GovernanceHighlight::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_highlights_visible_created")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_highlights_category_state")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GovernanceHighlight::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GovernanceHighlight {
    #[sea_orm(iden = "governance_highlights")]
    Table,
    Id,
    Title,
    Category,
    State,
    District,
    Locality,
    Status,
    Description,
    SourceName,
    SourceUrl,
    PublishedAt,
    IsVisible,
    IsVerified,
    CreatedAt,
    UpdatedAt,
}
