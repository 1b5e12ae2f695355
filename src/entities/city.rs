use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "city")]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_city::Entity")]
    UserCities,
}

impl Related<super::user_city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
