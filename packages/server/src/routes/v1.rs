use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/mods", mod_routes())
        .merge(catalog_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn mod_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::mods::search_mods).post(handlers::mods::create_mod),
        )
        .route("/pending", get(handlers::mods::list_pending))
        .route("/mine", get(handlers::mods::list_mine))
        .route(
            "/{uuid}",
            get(handlers::mods::get_mod)
                .patch(handlers::mods::update_mod)
                .delete(handlers::mods::delete_mod),
        )
        .route("/{uuid}/approve", post(handlers::mods::approve_mod))
        .route("/{uuid}/reject", post(handlers::mods::reject_mod))
        .nest("/{uuid}/images", image_routes())
        .route(
            "/{uuid}/comments",
            get(handlers::feedback::list_comments).post(handlers::feedback::add_comment),
        )
        .route("/{uuid}/ratings", post(handlers::feedback::rate_mod))
        .route("/{uuid}/downloads", post(handlers::feedback::record_download))
}

fn image_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::images::list_images).post(handlers::images::add_image),
        )
        .route("/{id}", delete(handlers::images::delete_image))
        .route("/{id}/thumbnail", post(handlers::images::set_thumbnail))
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .route(
            "/tags",
            get(handlers::catalog::list_tags).post(handlers::catalog::create_tag),
        )
        .route(
            "/races",
            get(handlers::catalog::list_races).post(handlers::catalog::create_race),
        )
        .route(
            "/genders",
            get(handlers::catalog::list_genders).post(handlers::catalog::create_gender),
        )
}
