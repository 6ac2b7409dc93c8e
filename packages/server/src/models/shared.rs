use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::limits::URL_MAX;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Plain `page`/`per_page` query for listings without filters.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    pub per_page: Option<u64>,
}

/// Clamp raw `page`/`per_page` query values to sane bounds.
pub fn page_bounds(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = Ord::max(page.unwrap_or(1), 1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Parse a comma-separated ID list such as `"3,5,8"`. Blank entries are skipped.
pub fn parse_id_list(raw: Option<&str>, name: &str) -> Result<Vec<i32>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<i32>()
            .map_err(|_| AppError::Validation(format!("{name} must be a list of integers")))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Validate an ID list from a request body (no duplicates, bounded length).
pub fn validate_id_list(ids: &[i32], name: &str, max: usize) -> Result<(), AppError> {
    if ids.len() > max {
        return Err(AppError::Validation(format!("Too many {name}: max {max}")));
    }
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("Duplicate {name} ID: {id}")));
        }
    }
    Ok(())
}

/// Blob store references must be absolute http(s) URLs.
pub fn validate_url(url: &str, name: &str) -> Result<(), AppError> {
    let url = url.trim();
    let has_scheme = url.starts_with("https://") || url.starts_with("http://");
    if !has_scheme || url.len() > URL_MAX || url.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(format!(
            "{name} must be an http(s) URL of at most {URL_MAX} bytes"
        )));
    }
    Ok(())
}

/// Integer that saturates at the `i64` bounds instead of failing to parse.
///
/// Lets range checks report `12345678901234567890` as out of range rather
/// than as malformed JSON. Whole-valued floats are accepted; fractions are not.
struct SaturatingI64(i64);

impl<'de> Deserialize<'de> for SaturatingI64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SaturatingVisitor;

        impl Visitor<'_> for SaturatingVisitor {
            type Value = i64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
                Ok(i64::try_from(v).unwrap_or(i64::MAX))
            }

            fn visit_i128<E: de::Error>(self, v: i128) -> Result<i64, E> {
                Ok(v.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<i64, E> {
                Ok(i64::try_from(v).unwrap_or(i64::MAX))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
                if v.is_finite() && v.fract() == 0.0 {
                    // `as` saturates at the i64 bounds.
                    Ok(v as i64)
                } else {
                    Err(E::invalid_type(Unexpected::Float(v), &self))
                }
            }
        }

        deserializer
            .deserialize_any(SaturatingVisitor)
            .map(SaturatingI64)
    }
}

/// `deserialize_with` helper for `i64` fields that go through a range check.
pub fn saturating_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    SaturatingI64::deserialize(deserializer).map(|v| v.0)
}

/// Optional variant of [`saturating_i64`]; pair it with `#[serde(default)]`.
pub fn saturating_i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SaturatingI64>::deserialize(deserializer)?.map(|v| v.0))
}
