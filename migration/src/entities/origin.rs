use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "origins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub track_registrations: bool,
    /// Tracked parameter names, one per line.
    #[sea_orm(column_type = "Text", nullable)]
    pub querystring_parameters: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub redirect_to: Option<String>,
    pub number_of_registrations: i64,
    pub created_at: DateTimeUtc,
    pub origin_group_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
