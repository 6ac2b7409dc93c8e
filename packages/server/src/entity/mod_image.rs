use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mod_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub mod_id: i32,
    #[sea_orm(belongs_to, from = "mod_id", to = "id")]
    pub game_mod: HasOne<super::game_mod::Entity>,

    pub url: String,

    #[sea_orm(default_value = false)]
    pub is_thumbnail: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
