pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod search;
pub mod seed;
pub mod state;
pub mod utils;
pub mod validation;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use axum::{Json, routing::get};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ModHub API",
        version = "1.0.0",
        description = "API for uploading, moderating and discovering game mods"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::mods::search_mods,
        handlers::mods::list_pending,
        handlers::mods::list_mine,
        handlers::mods::create_mod,
        handlers::mods::get_mod,
        handlers::mods::update_mod,
        handlers::mods::delete_mod,
        handlers::mods::approve_mod,
        handlers::mods::reject_mod,
        handlers::images::list_images,
        handlers::images::add_image,
        handlers::images::delete_image,
        handlers::images::set_thumbnail,
        handlers::feedback::list_comments,
        handlers::feedback::add_comment,
        handlers::feedback::rate_mod,
        handlers::feedback::record_download,
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::list_tags,
        handlers::catalog::create_tag,
        handlers::catalog::list_races,
        handlers::catalog::create_race,
        handlers::catalog::list_genders,
        handlers::catalog::create_gender,
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Mods", description = "Mod upload, search and maintenance"),
        (name = "Moderation", description = "Approval workflow"),
        (name = "Images", description = "Mod screenshots and the thumbnail"),
        (name = "Feedback", description = "Comments, ratings and download tracking"),
        (name = "Catalog", description = "Categories, tags, races and genders"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allow_origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                        None
                    }
                }),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(state)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
}
