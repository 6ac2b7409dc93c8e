pub mod auth;
pub mod catalog;
pub mod feedback;
pub mod images;
pub mod mods;
