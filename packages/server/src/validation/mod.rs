//! Invariant checks for mods and their dependent rows.
//!
//! Everything in here is pure: handlers load the rows they need, call into
//! these functions, and only write to the database once a check has passed.

mod error;
mod mod_rules;
mod thumbnail;

pub mod limits;

pub use error::ModError;
pub use mod_rules::{
    CategoryRules, Compatibility, ModDraft, check_compatibility, check_file_size, check_length,
    validate_mod,
};
pub use thumbnail::{ImageState, RemovalPlan, ThumbnailPlan, plan_after_removal, plan_new_image};
