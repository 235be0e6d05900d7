use sea_orm::entity::prelude::*;

pub const SINGLETON_ID: i64 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "site_contents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub slogan: String,
    pub description: String,
    pub advantage1_title: String,
    pub advantage1_text: String,
    pub advantage2_title: String,
    pub advantage2_text: String,
    pub advantage3_title: String,
    pub advantage3_text: String,
    pub advantage4_title: String,
    pub advantage4_text: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
