use super::error::ModError;
use super::limits::{
    DESCRIPTION_MAX, MAX_FILE_SIZE, MIN_FILE_SIZE, SHORT_DESC_MAX, TITLE_MAX, VERSION_MAX,
};
use crate::entity::{category, mod_compatibility};

/// The scalar fields of a mod as they would be written.
#[derive(Debug, Clone, Copy)]
pub struct ModDraft<'a> {
    pub title: &'a str,
    pub short_desc: &'a str,
    pub description: &'a str,
    pub version: &'a str,
    pub file_size: i64,
}

/// Requirements a category imposes on the compatibility rows of its mods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryRules {
    pub requires_race: bool,
    pub requires_gender: bool,
}

impl From<&category::Model> for CategoryRules {
    fn from(c: &category::Model) -> Self {
        Self {
            requires_race: c.requires_race,
            requires_gender: c.requires_gender,
        }
    }
}

/// One race/gender pairing a mod declares support for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compatibility {
    pub race_id: Option<i32>,
    pub gender_id: Option<i32>,
}

impl From<&mod_compatibility::Model> for Compatibility {
    fn from(m: &mod_compatibility::Model) -> Self {
        Self {
            race_id: Some(m.race_id),
            gender_id: m.gender_id,
        }
    }
}

pub fn check_file_size(file_size: i64) -> Result<(), ModError> {
    if (MIN_FILE_SIZE..=MAX_FILE_SIZE).contains(&file_size) {
        Ok(())
    } else {
        Err(ModError::InvalidFileSize(file_size))
    }
}

/// Bounds are inclusive and counted in Unicode characters of the trimmed value.
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ModError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(ModError::InvalidFieldLength { field, min, max });
    }
    Ok(())
}

/// Resolve the category's race/gender requirements against the declared rows.
pub fn check_compatibility(
    rules: &CategoryRules,
    rows: &[Compatibility],
) -> Result<(), ModError> {
    if rules.requires_race && !rows.iter().any(|r| r.race_id.is_some()) {
        return Err(ModError::MissingRaceCompatibility);
    }
    if rules.requires_gender && !rows.iter().any(|r| r.gender_id.is_some()) {
        return Err(ModError::MissingGenderCompatibility);
    }
    Ok(())
}

/// Run every check a mod must pass before it is created or updated.
///
/// `category` is `None` when the mod has no category or the referenced one
/// does not exist. Checks run in a fixed order so the first violation wins:
/// file size, field lengths, category, race, gender.
pub fn validate_mod(
    draft: &ModDraft<'_>,
    category: Option<&CategoryRules>,
    compatibility: &[Compatibility],
) -> Result<(), ModError> {
    check_file_size(draft.file_size)?;
    check_length("Title", draft.title, 1, TITLE_MAX)?;
    check_length("Short description", draft.short_desc, 1, SHORT_DESC_MAX)?;
    check_length("Description", draft.description, 1, DESCRIPTION_MAX)?;
    check_length("Version", draft.version, 1, VERSION_MAX)?;

    let rules = category.ok_or(ModError::MissingCategory)?;
    check_compatibility(rules, compatibility)
}
