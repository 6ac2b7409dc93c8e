use thiserror::Error;

/// A rule violation detected while validating a mod or one of its lookup rows.
///
/// These are deterministic input errors; retrying the same write fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModError {
    #[error("File size must be between 1 and 1073741824 bytes (got {0})")]
    InvalidFileSize(i64),

    #[error("A mod must belong to an existing category")]
    MissingCategory,

    #[error("This mod requires one or more compatible races to be selected")]
    MissingRaceCompatibility,

    #[error("This mod requires one or more compatible genders to be selected")]
    MissingGenderCompatibility,

    #[error("{field} must be {min}-{max} characters")]
    InvalidFieldLength {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{0} already exists")]
    DuplicateConstraint(String),
}

impl ModError {
    /// Machine-readable code carried in the HTTP error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFileSize(_) => "INVALID_FILE_SIZE",
            Self::MissingCategory => "MISSING_CATEGORY",
            Self::MissingRaceCompatibility => "MISSING_RACE_COMPATIBILITY",
            Self::MissingGenderCompatibility => "MISSING_GENDER_COMPATIBILITY",
            Self::InvalidFieldLength { .. } => "INVALID_FIELD_LENGTH",
            Self::DuplicateConstraint(_) => "DUPLICATE",
        }
    }
}
