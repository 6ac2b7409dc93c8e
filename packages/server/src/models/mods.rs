use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::game_mod;
use crate::error::AppError;
use crate::validation::Compatibility;
use crate::validation::limits::DEFAULT_VERSION;

use super::image::ImageResponse;
pub use super::shared::Pagination;
use super::shared::{saturating_i64, saturating_i64_opt, validate_id_list, validate_url};

pub const MAX_TAGS_PER_MOD: usize = 32;
pub const MAX_COMPATIBILITY_ROWS: usize = 64;

/// One supported race, optionally narrowed to a gender.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, utoipa::ToSchema)]
pub struct CompatibilityEntry {
    #[schema(example = 3)]
    pub race_id: i32,
    /// Omit or `null` for "every gender".
    #[schema(example = 1)]
    pub gender_id: Option<i32>,
}

impl From<CompatibilityEntry> for Compatibility {
    fn from(e: CompatibilityEntry) -> Self {
        Self {
            race_id: Some(e.race_id),
            gender_id: e.gender_id,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateModRequest {
    #[schema(example = "Better Armor Textures")]
    pub title: String,
    #[schema(example = "High resolution armor retexture")]
    pub short_desc: String,
    pub description: String,
    /// Defaults to `1.0.0`.
    #[schema(example = "1.0.0")]
    pub version: Option<String>,
    /// Location of the uploaded archive in the blob store.
    #[schema(example = "https://cdn.example.com/mods/better-armor.zip")]
    pub file_url: String,
    /// Archive size in bytes (1 - 1073741824).
    #[schema(example = 12288)]
    #[serde(deserialize_with = "saturating_i64")]
    pub file_size: i64,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub compatibility: Vec<CompatibilityEntry>,
}

impl CreateModRequest {
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }
}

/// PATCH body: absent fields are left untouched. `tag_ids` and
/// `compatibility` replace the whole set when present.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateModRequest {
    pub title: Option<String>,
    pub short_desc: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "saturating_i64_opt")]
    pub file_size: Option<i64>,
    pub category_id: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
    pub compatibility: Option<Vec<CompatibilityEntry>>,
}

/// Request-shape checks; the mod invariants themselves live in `validation`.
pub fn validate_create_mod(req: &CreateModRequest) -> Result<(), AppError> {
    validate_url(&req.file_url, "file_url")?;
    validate_id_list(&req.tag_ids, "tag", MAX_TAGS_PER_MOD)?;
    validate_compatibility_list(&req.compatibility)
}

pub fn validate_update_mod(req: &UpdateModRequest) -> Result<(), AppError> {
    if let Some(ref url) = req.file_url {
        validate_url(url, "file_url")?;
    }
    if let Some(ref tags) = req.tag_ids {
        validate_id_list(tags, "tag", MAX_TAGS_PER_MOD)?;
    }
    if let Some(ref rows) = req.compatibility {
        validate_compatibility_list(rows)?;
    }
    Ok(())
}

fn validate_compatibility_list(rows: &[CompatibilityEntry]) -> Result<(), AppError> {
    if rows.len() > MAX_COMPATIBILITY_ROWS {
        return Err(AppError::Validation(format!(
            "Too many compatibility entries: max {MAX_COMPATIBILITY_ROWS}"
        )));
    }
    for (i, row) in rows.iter().enumerate() {
        if rows[..i].contains(row) {
            return Err(AppError::Validation(format!(
                "Duplicate compatibility entry for race {}",
                row.race_id
            )));
        }
    }
    Ok(())
}

/// Search parameters for `GET /mods`. List filters are comma-separated IDs.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModSearchQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub category_id: Option<i32>,
    /// e.g. `3,5` - mods carrying any of these tags.
    pub tag_ids: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub user_id: Option<i32>,
    /// e.g. `1,2` - mods compatible with any of these races.
    pub race_ids: Option<String>,
    /// e.g. `1` - mods compatible with any of these genders.
    pub gender_ids: Option<String>,
}

/// Catalog card shown in list and search results.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ModListItem {
    pub uuid: Uuid,
    pub title: String,
    pub short_desc: String,
    pub version: String,
    pub thumbnail: Option<String>,
    pub category_id: i32,
    pub user_id: i32,
    pub downloads: i32,
    pub approved: bool,
    pub upload_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl From<game_mod::Model> for ModListItem {
    fn from(m: game_mod::Model) -> Self {
        Self {
            uuid: m.uuid,
            title: m.title,
            short_desc: m.short_desc,
            version: m.version,
            thumbnail: m.thumbnail,
            category_id: m.category_id,
            user_id: m.user_id,
            downloads: m.downloads,
            approved: m.approved,
            upload_date: m.upload_date,
            updated_date: m.updated_date,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ModListResponse {
    pub data: Vec<ModListItem>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CompatibilityResponse {
    pub race: NamedRef,
    pub gender: Option<NamedRef>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingSummary {
    /// `null` until the first rating arrives.
    pub average: Option<f64>,
    pub count: u64,
}

/// Full mod detail.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ModResponse {
    pub uuid: Uuid,
    pub title: String,
    pub short_desc: String,
    pub description: String,
    pub version: String,
    pub file_url: String,
    pub file_size: i64,
    pub user_id: i32,
    pub downloads: i32,
    pub approved: bool,
    pub thumbnail: Option<String>,
    pub category: NamedRef,
    pub tags: Vec<NamedRef>,
    pub compatibility: Vec<CompatibilityResponse>,
    pub images: Vec<ImageResponse>,
    pub rating: RatingSummary,
    pub upload_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DownloadResponse {
    pub uuid: Uuid,
    pub file_url: String,
    /// Counter after this download was recorded.
    pub downloads: i32,
}
