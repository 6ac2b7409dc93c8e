use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mod_compatibility")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub mod_id: i32,
    #[sea_orm(belongs_to, from = "mod_id", to = "id")]
    pub game_mod: HasOne<super::game_mod::Entity>,

    pub race_id: i32,
    #[sea_orm(belongs_to, from = "race_id", to = "id")]
    pub race: HasOne<super::race::Entity>,

    /// NULL when the mod supports every gender of the race.
    pub gender_id: Option<i32>,
    #[sea_orm(belongs_to, from = "gender_id", to = "id")]
    pub gender: HasOne<super::gender::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
