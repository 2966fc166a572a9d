//! Querystring parameter counter entity.
//!
//! Unique on (identifier, value, origin_code); the counter is only ever
//! mutated through the storage layer's atomic upsert.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "querystring_parameters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub identifier: String,
    pub value: String,
    pub origin_code: String,
    pub number_of_registrations: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
