//! Field bounds shared by the validators and the request models.

pub const MIN_FILE_SIZE: i64 = 1;
/// 1 GiB.
pub const MAX_FILE_SIZE: i64 = 1_073_741_824;

pub const TITLE_MAX: usize = 120;
pub const SHORT_DESC_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const VERSION_MAX: usize = 20;
pub const DEFAULT_VERSION: &str = "1.0.0";

pub const CATEGORY_NAME_MAX: usize = 120;
pub const TAG_NAME_MAX: usize = 40;
pub const RACE_NAME_MAX: usize = 120;
pub const GENDER_NAME_MAX: usize = 10;

pub const USERNAME_MAX: usize = 40;
pub const COMMENT_MAX: usize = 1000;
pub const URL_MAX: usize = 2048;

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;
