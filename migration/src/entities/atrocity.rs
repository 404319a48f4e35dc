use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "atrocities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// JSON array of image URLs
    #[sea_orm(column_type = "Text")]
    pub images: String,
    pub occurred_at: Option<DateTimeUtc>,
    pub is_verified: bool,
    pub reported_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
