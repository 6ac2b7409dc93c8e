use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_mod")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public identifier used in URLs.
    #[sea_orm(unique)]
    pub uuid: Uuid,

    pub title: String,
    pub short_desc: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub version: String,

    /// Location of the archive in the external blob store.
    pub file_url: String,
    /// In bytes, 1..=1 GiB.
    pub file_size: i64,

    #[sea_orm(default_value = 0)]
    pub downloads: i32,
    #[sea_orm(default_value = false)]
    pub approved: bool,

    /// Mirrors the URL of the image flagged `is_thumbnail`, if any.
    pub thumbnail: Option<String>,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    #[sea_orm(has_many, via = "mod_tag")]
    pub tags: HasMany<super::tag::Entity>,

    #[sea_orm(has_many)]
    pub compatibilities: HasMany<super::mod_compatibility::Entity>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::mod_image::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    #[sea_orm(has_many)]
    pub download_records: HasMany<super::download::Entity>,

    #[sea_orm(has_many)]
    pub ratings: HasMany<super::rating::Entity>,

    pub upload_date: DateTimeUtc,
    pub updated_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
