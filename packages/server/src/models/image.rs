use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::mod_image;
use crate::error::AppError;
use crate::validation::ImageState;

use super::shared::validate_url;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateImageRequest {
    /// Location of the image in the blob store.
    #[schema(example = "https://cdn.example.com/mod_images/cover.jpg")]
    pub url: String,
    /// Make this the mod's thumbnail, demoting any previous one.
    #[serde(default)]
    pub is_thumbnail: bool,
}

pub fn validate_create_image(req: &CreateImageRequest) -> Result<(), AppError> {
    validate_url(&req.url, "url")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    pub id: i32,
    pub url: String,
    pub is_thumbnail: bool,
    pub created_at: DateTime<Utc>,
}

impl From<mod_image::Model> for ImageResponse {
    fn from(m: mod_image::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            is_thumbnail: m.is_thumbnail,
            created_at: m.created_at,
        }
    }
}

impl From<&mod_image::Model> for ImageState {
    fn from(m: &mod_image::Model) -> Self {
        Self {
            id: m.id,
            url: m.url.clone(),
            is_thumbnail: m.is_thumbnail,
        }
    }
}
