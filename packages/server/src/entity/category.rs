use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Immutable once created.
    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(default_value = false)]
    pub requires_race: bool,
    #[sea_orm(default_value = false)]
    pub requires_gender: bool,

    #[sea_orm(has_many)]
    pub mods: HasMany<super::game_mod::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
