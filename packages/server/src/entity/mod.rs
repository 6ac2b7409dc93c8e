pub mod category;
pub mod comment;
pub mod download;
pub mod game_mod;
pub mod gender;
pub mod mod_compatibility;
pub mod mod_image;
pub mod mod_tag;
pub mod race;
pub mod rating;
pub mod tag;
pub mod user;
