pub mod auth;
pub mod catalog;
pub mod feedback;
pub mod image;
pub mod mods;
pub mod role;
pub mod shared;
