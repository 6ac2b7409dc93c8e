
mod auth;
mod mods;
