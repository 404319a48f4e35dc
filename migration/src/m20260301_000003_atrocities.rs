use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Atrocity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Atrocity::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Atrocity::Title).string().not_null())
                    .col(ColumnDef::new(Atrocity::State).string().not_null())
                    .col(ColumnDef::new(Atrocity::District).string().null())
                    .col(ColumnDef::new(Atrocity::Locality).string().null())
                    .col(ColumnDef::new(Atrocity::Description).text().not_null())
                    // JSON 数组，按文本存储以兼容三种后端
                    .col(
                        ColumnDef::new(Atrocity::Images)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Atrocity::OccurredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Atrocity::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Atrocity::ReportedBy).string_len(36).null())
                    .col(
                        ColumnDef::new(Atrocity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Atrocity::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 位置层级查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_atrocities_location")
                    .table(Atrocity::Table)
                    .col(Atrocity::State)
                    .col(Atrocity::District)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_atrocities_created_at")
                    .table(Atrocity::Table)
                    .col(Atrocity::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_atrocities_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_atrocities_location").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Atrocity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Atrocity {
    #[sea_orm(iden = "atrocities")]
    Table,
    Id,
    Title,
    State,
    District,
    Locality,
    Description,
    Images,
    OccurredAt,
    IsVerified,
    ReportedBy,
    CreatedAt,
    UpdatedAt,
}
