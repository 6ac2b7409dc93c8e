use serde::{Deserialize, Serialize};

use crate::entity::{category, gender, race, tag};
use crate::error::AppError;
use crate::validation::check_length;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Armor")]
    pub name: String,
    #[serde(default)]
    pub requires_race: bool,
    #[serde(default)]
    pub requires_gender: bool,
}

/// Body for the name-only lookup tables (tags, races, genders).
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateNamedRequest {
    #[schema(example = "Nord")]
    pub name: String,
}

/// Trim and bound-check a lookup name, returning the value to store.
pub fn validate_name(field: &'static str, name: &str, max: usize) -> Result<String, AppError> {
    check_length(field, name, 1, max)?;
    Ok(name.trim().to_string())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub requires_race: bool,
    pub requires_gender: bool,
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            requires_race: m.requires_race,
            requires_gender: m.requires_gender,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LookupResponse {
    pub id: i32,
    pub name: String,
}

impl From<tag::Model> for LookupResponse {
    fn from(m: tag::Model) -> Self {
        Self { id: m.id, name: m.name }
    }
}

impl From<race::Model> for LookupResponse {
    fn from(m: race::Model) -> Self {
        Self { id: m.id, name: m.name }
    }
}

impl From<gender::Model> for LookupResponse {
    fn from(m: gender::Model) -> Self {
        Self { id: m.id, name: m.name }
    }
}
