use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{game_mod, mod_image};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::image::{CreateImageRequest, ImageResponse, validate_create_image};
use crate::models::role::Permission;
use crate::state::AppState;
use crate::validation::{ImageState, RemovalPlan, plan_after_removal, plan_new_image};

use super::mods::{find_approved_mod, find_mod};

#[utoipa::path(
    get,
    path = "/api/v1/mods/{uuid}/images",
    tag = "Images",
    operation_id = "listImages",
    summary = "Images of an approved mod",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Images in upload order", body = Vec<ImageResponse>),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(uuid = %uuid))]
pub async fn list_images(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<Vec<ImageResponse>>, AppError> {
    let parent = find_approved_mod(&state.db, uuid).await?;
    let images = images_of(&state.db, parent.id).await?;
    Ok(Json(images.into_iter().map(ImageResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/images",
    tag = "Images",
    operation_id = "addImage",
    summary = "Attach an image to a mod",
    description = "Stores an image URL for the mod. A flagged image becomes the only thumbnail; the first image of a mod becomes the thumbnail even when not flagged. Allowed to the owner or holders of `mod:moderate_any`.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    request_body = CreateImageRequest,
    responses(
        (status = 201, description = "Image attached", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(uuid = %uuid))]
pub async fn add_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    AppJson(payload): AppJson<CreateImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_image(&payload)?;

    let txn = state.db.begin().await?;

    let parent = find_mod(&txn, uuid).await?;
    auth_user.require_owner_or(parent.user_id, Permission::ModModerateAny)?;

    let existing: Vec<ImageState> = images_of(&txn, parent.id)
        .await?
        .iter()
        .map(ImageState::from)
        .collect();
    let plan = plan_new_image(&existing, payload.is_thumbnail);

    if !plan.demote.is_empty() {
        mod_image::Entity::update_many()
            .col_expr(mod_image::Column::IsThumbnail, Expr::value(false))
            .filter(mod_image::Column::Id.is_in(plan.demote.iter().copied()))
            .exec(&txn)
            .await?;
    }

    let url = payload.url.trim().to_string();
    let image = mod_image::ActiveModel {
        mod_id: Set(parent.id),
        url: Set(url.clone()),
        is_thumbnail: Set(plan.is_thumbnail),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if plan.update_mod {
        set_mod_thumbnail(&txn, parent.id, Some(url)).await?;
    }

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/mods/{uuid}/images/{id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Remove an image",
    description = "Deletes the image and re-derives the thumbnail: a lone remaining image is promoted, otherwise the thumbnail is cleared when none is left flagged. Allowed to the owner or holders of `mod:moderate_any`.",
    params(
        ("uuid" = Uuid, Path, description = "Mod UUID"),
        ("id" = i32, Path, description = "Image ID"),
    ),
    responses(
        (status = 204, description = "Image removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(uuid = %uuid, id))]
pub async fn delete_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((uuid, id)): Path<(Uuid, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let parent = find_mod(&txn, uuid).await?;
    auth_user.require_owner_or(parent.user_id, Permission::ModModerateAny)?;
    find_image(&txn, parent.id, id).await?;

    mod_image::Entity::delete_by_id(id).exec(&txn).await?;

    let remaining: Vec<ImageState> = images_of(&txn, parent.id)
        .await?
        .iter()
        .map(ImageState::from)
        .collect();
    match plan_after_removal(&remaining) {
        RemovalPlan::Keep => {}
        RemovalPlan::Promote { id, url } => {
            mod_image::Entity::update_many()
                .col_expr(mod_image::Column::IsThumbnail, Expr::value(true))
                .filter(mod_image::Column::Id.eq(id))
                .exec(&txn)
                .await?;
            set_mod_thumbnail(&txn, parent.id, Some(url)).await?;
        }
        RemovalPlan::Clear => set_mod_thumbnail(&txn, parent.id, None).await?,
    }

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/images/{id}/thumbnail",
    tag = "Images",
    operation_id = "setThumbnail",
    summary = "Make an existing image the thumbnail",
    description = "Flags the image as thumbnail, unflags every other image of the mod and mirrors the URL on the mod. Allowed to the owner or holders of `mod:moderate_any`.",
    params(
        ("uuid" = Uuid, Path, description = "Mod UUID"),
        ("id" = i32, Path, description = "Image ID"),
    ),
    responses(
        (status = 200, description = "Thumbnail set", body = ImageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(uuid = %uuid, id))]
pub async fn set_thumbnail(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((uuid, id)): Path<(Uuid, i32)>,
) -> Result<Json<ImageResponse>, AppError> {
    let txn = state.db.begin().await?;

    let parent = find_mod(&txn, uuid).await?;
    auth_user.require_owner_or(parent.user_id, Permission::ModModerateAny)?;
    let image = find_image(&txn, parent.id, id).await?;

    mod_image::Entity::update_many()
        .col_expr(mod_image::Column::IsThumbnail, Expr::value(false))
        .filter(mod_image::Column::ModId.eq(parent.id))
        .filter(mod_image::Column::Id.ne(id))
        .exec(&txn)
        .await?;

    let url = image.url.clone();
    let mut active: mod_image::ActiveModel = image.into();
    active.is_thumbnail = Set(true);
    let image = active.update(&txn).await?;

    set_mod_thumbnail(&txn, parent.id, Some(url)).await?;

    txn.commit().await?;
    Ok(Json(image.into()))
}

async fn images_of<C: ConnectionTrait>(
    db: &C,
    mod_id: i32,
) -> Result<Vec<mod_image::Model>, AppError> {
    Ok(mod_image::Entity::find()
        .filter(mod_image::Column::ModId.eq(mod_id))
        .order_by_asc(mod_image::Column::Id)
        .all(db)
        .await?)
}

async fn find_image<C: ConnectionTrait>(
    db: &C,
    mod_id: i32,
    id: i32,
) -> Result<mod_image::Model, AppError> {
    mod_image::Entity::find_by_id(id)
        .filter(mod_image::Column::ModId.eq(mod_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))
}

async fn set_mod_thumbnail<C: ConnectionTrait>(
    db: &C,
    mod_id: i32,
    url: Option<String>,
) -> Result<(), AppError> {
    game_mod::Entity::update_many()
        .col_expr(game_mod::Column::Thumbnail, Expr::value(url))
        .filter(game_mod::Column::Id.eq(mod_id))
        .exec(db)
        .await?;
    Ok(())
}
