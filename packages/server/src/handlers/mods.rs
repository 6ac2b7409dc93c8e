use std::collections::{BTreeSet, HashMap};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::{
    category, comment, download, game_mod, gender, mod_compatibility, mod_image, mod_tag, race,
    rating, tag,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::query::AppQuery;
use crate::models::image::ImageResponse;
use crate::models::mods::*;
use crate::models::role::Permission;
use crate::models::shared::{PageQuery, page_bounds};
use crate::search::{ModFilter, approved_mods};
use crate::state::AppState;
use crate::validation::{CategoryRules, Compatibility, ModDraft, validate_mod};

#[utoipa::path(
    get,
    path = "/api/v1/mods",
    tag = "Mods",
    operation_id = "searchMods",
    summary = "Search approved mods",
    description = "Lists approved mods, newest first. Every supplied filter must match; IDs inside one list filter are alternatives. Title matching is a case-insensitive substring match.",
    params(ModSearchQuery),
    responses(
        (status = 200, description = "Matching mods", body = ModListResponse),
        (status = 400, description = "Malformed filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_mods(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ModSearchQuery>,
) -> Result<Json<ModListResponse>, AppError> {
    let filter = ModFilter::try_from(&query)?;
    let select = approved_mods(&filter);
    let page = page_of_mods(&state.db, select, query.page, query.per_page).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/mods/pending",
    tag = "Moderation",
    operation_id = "listPendingMods",
    summary = "Moderation queue",
    description = "Unapproved mods, oldest first. Requires `mod:approve` permission.",
    params(PageQuery),
    responses(
        (status = 200, description = "Pending mods", body = ModListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_pending(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<ModListResponse>, AppError> {
    auth_user.require_permission(Permission::ModApprove)?;

    let select = game_mod::Entity::find()
        .filter(game_mod::Column::Approved.eq(false))
        .order_by_asc(game_mod::Column::UploadDate)
        .order_by_asc(game_mod::Column::Id);
    let page = page_of_mods(&state.db, select, query.page, query.per_page).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/mods/mine",
    tag = "Mods",
    operation_id = "listMyMods",
    summary = "Mods uploaded by the caller",
    description = "Includes mods still awaiting approval.",
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's mods", body = ModListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_mine(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<ModListResponse>, AppError> {
    let select = game_mod::Entity::find()
        .filter(game_mod::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(game_mod::Column::UploadDate)
        .order_by_desc(game_mod::Column::Id);
    let page = page_of_mods(&state.db, select, query.page, query.per_page).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/mods",
    tag = "Mods",
    operation_id = "createMod",
    summary = "Upload a mod",
    description = "Creates an unapproved mod with its tags and compatibility rows. The mod, its tags and its compatibility rows are written in one transaction after every check has passed. Requires `mod:create` permission.",
    request_body = CreateModRequest,
    responses(
        (status = 201, description = "Mod created", body = ModResponse),
        (status = 400, description = "Rejected (VALIDATION_ERROR, INVALID_FILE_SIZE, INVALID_FIELD_LENGTH, MISSING_CATEGORY, MISSING_RACE_COMPATIBILITY, MISSING_GENDER_COMPATIBILITY)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_mod(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateModRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(Permission::ModCreate)?;
    validate_create_mod(&payload)?;

    let txn = state.db.begin().await?;

    let category = load_category(&txn, payload.category_id).await?;
    let rows: Vec<Compatibility> = payload
        .compatibility
        .iter()
        .copied()
        .map(Compatibility::from)
        .collect();
    let draft = ModDraft {
        title: &payload.title,
        short_desc: &payload.short_desc,
        description: &payload.description,
        version: payload.version(),
        file_size: payload.file_size,
    };
    validate_mod(&draft, category.as_ref(), &rows)?;
    check_references(&txn, &payload.tag_ids, &payload.compatibility).await?;

    let now = chrono::Utc::now();
    let new_mod = game_mod::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        title: Set(payload.title.trim().to_string()),
        short_desc: Set(payload.short_desc.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        version: Set(payload.version().trim().to_string()),
        file_url: Set(payload.file_url.trim().to_string()),
        file_size: Set(payload.file_size),
        downloads: Set(0),
        approved: Set(false),
        thumbnail: Set(None),
        user_id: Set(auth_user.user_id),
        category_id: Set(payload.category_id.unwrap_or_default()),
        upload_date: Set(now),
        updated_date: Set(now),
        ..Default::default()
    };
    let model = new_mod
        .insert(&txn)
        .await
        .map_err(|e| AppError::from_write(e, "mod"))?;

    replace_tags(&txn, model.id, &payload.tag_ids).await?;
    replace_compatibility(&txn, model.id, &payload.compatibility).await?;

    txn.commit().await?;
    info!(mod_id = model.id, uuid = %model.uuid, "Mod created");

    let detail = mod_detail(&state.db, model).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    get,
    path = "/api/v1/mods/{uuid}",
    tag = "Mods",
    operation_id = "getMod",
    summary = "Mod detail",
    description = "Returns an approved mod with its category, tags, compatibility, images and rating summary. Unapproved mods are reported as not found.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Mod detail", body = ModResponse),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(uuid = %uuid))]
pub async fn get_mod(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ModResponse>, AppError> {
    let model = find_approved_mod(&state.db, uuid).await?;
    Ok(Json(mod_detail(&state.db, model).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/mods/{uuid}",
    tag = "Mods",
    operation_id = "updateMod",
    summary = "Update a mod",
    description = "PATCH semantics: only provided fields change; `tag_ids` and `compatibility` replace the whole set when present. The merged mod is validated again before anything is written. Allowed to the owner or holders of `mod:moderate_any`.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    request_body = UpdateModRequest,
    responses(
        (status = 200, description = "Mod updated", body = ModResponse),
        (status = 400, description = "Rejected (VALIDATION_ERROR, INVALID_FILE_SIZE, INVALID_FIELD_LENGTH, MISSING_CATEGORY, MISSING_RACE_COMPATIBILITY, MISSING_GENDER_COMPATIBILITY)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(uuid = %uuid))]
pub async fn update_mod(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    AppJson(payload): AppJson<UpdateModRequest>,
) -> Result<Json<ModResponse>, AppError> {
    validate_update_mod(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_mod(&txn, uuid).await?;
    auth_user.require_owner_or(existing.user_id, Permission::ModModerateAny)?;

    if payload == UpdateModRequest::default() {
        txn.commit().await?;
        return Ok(Json(mod_detail(&state.db, existing).await?));
    }

    let category_id = payload.category_id.unwrap_or(existing.category_id);
    let category = load_category(&txn, Some(category_id)).await?;

    let rows: Vec<Compatibility> = match payload.compatibility {
        Some(ref entries) => entries.iter().copied().map(Compatibility::from).collect(),
        None => mod_compatibility::Entity::find()
            .filter(mod_compatibility::Column::ModId.eq(existing.id))
            .all(&txn)
            .await?
            .iter()
            .map(Compatibility::from)
            .collect(),
    };

    let draft = ModDraft {
        title: payload.title.as_deref().unwrap_or(&existing.title),
        short_desc: payload.short_desc.as_deref().unwrap_or(&existing.short_desc),
        description: payload
            .description
            .as_deref()
            .unwrap_or(&existing.description),
        version: payload.version.as_deref().unwrap_or(&existing.version),
        file_size: payload.file_size.unwrap_or(existing.file_size),
    };
    validate_mod(&draft, category.as_ref(), &rows)?;
    check_references(
        &txn,
        payload.tag_ids.as_deref().unwrap_or_default(),
        payload.compatibility.as_deref().unwrap_or_default(),
    )
    .await?;

    let mod_id = existing.id;
    let mut active: game_mod::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref short_desc) = payload.short_desc {
        active.short_desc = Set(short_desc.trim().to_string());
    }
    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(ref version) = payload.version {
        active.version = Set(version.trim().to_string());
    }
    if let Some(ref file_url) = payload.file_url {
        active.file_url = Set(file_url.trim().to_string());
    }
    if let Some(file_size) = payload.file_size {
        active.file_size = Set(file_size);
    }
    if payload.category_id.is_some() {
        active.category_id = Set(category_id);
    }
    active.updated_date = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;

    if let Some(ref tag_ids) = payload.tag_ids {
        replace_tags(&txn, mod_id, tag_ids).await?;
    }
    if let Some(ref entries) = payload.compatibility {
        replace_compatibility(&txn, mod_id, entries).await?;
    }

    txn.commit().await?;

    Ok(Json(mod_detail(&state.db, model).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/mods/{uuid}",
    tag = "Mods",
    operation_id = "deleteMod",
    summary = "Delete a mod",
    description = "Deletes the mod together with its images, compatibility rows, tag links, comments, downloads and ratings. Allowed to the owner or holders of `mod:moderate_any`.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 204, description = "Mod deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(uuid = %uuid))]
pub async fn delete_mod(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_mod(&txn, uuid).await?;
    auth_user.require_owner_or(existing.user_id, Permission::ModModerateAny)?;
    let id = existing.id;

    mod_image::Entity::delete_many()
        .filter(mod_image::Column::ModId.eq(id))
        .exec(&txn)
        .await?;
    mod_compatibility::Entity::delete_many()
        .filter(mod_compatibility::Column::ModId.eq(id))
        .exec(&txn)
        .await?;
    mod_tag::Entity::delete_many()
        .filter(mod_tag::Column::ModId.eq(id))
        .exec(&txn)
        .await?;
    comment::Entity::delete_many()
        .filter(comment::Column::ModId.eq(id))
        .exec(&txn)
        .await?;
    download::Entity::delete_many()
        .filter(download::Column::ModId.eq(id))
        .exec(&txn)
        .await?;
    rating::Entity::delete_many()
        .filter(rating::Column::ModId.eq(id))
        .exec(&txn)
        .await?;
    game_mod::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    info!(mod_id = id, by = auth_user.user_id, "Mod deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/approve",
    tag = "Moderation",
    operation_id = "approveMod",
    summary = "Approve a mod",
    description = "Makes the mod publicly visible. Requires `mod:approve` permission. Approving an approved mod is a no-op.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Mod approved", body = ModListItem),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(uuid = %uuid))]
pub async fn approve_mod(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ModListItem>, AppError> {
    auth_user.require_permission(Permission::ModApprove)?;

    let existing = find_mod(&state.db, uuid).await?;
    if existing.approved {
        return Ok(Json(existing.into()));
    }

    let mut active: game_mod::ActiveModel = existing.into();
    active.approved = Set(true);
    let model = active.update(&state.db).await?;

    info!(mod_id = model.id, by = auth_user.user_id, "Mod approved");
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/reject",
    tag = "Moderation",
    operation_id = "rejectMod",
    summary = "Reject a mod",
    description = "Withdraws approval and removes every image of the mod, leaving it without a thumbnail. Requires `mod:approve` permission.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Mod rejected", body = ModListItem),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(uuid = %uuid))]
pub async fn reject_mod(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ModListItem>, AppError> {
    auth_user.require_permission(Permission::ModApprove)?;

    let txn = state.db.begin().await?;

    let existing = find_mod(&txn, uuid).await?;
    let removed = mod_image::Entity::delete_many()
        .filter(mod_image::Column::ModId.eq(existing.id))
        .exec(&txn)
        .await?;

    let mut active: game_mod::ActiveModel = existing.into();
    active.approved = Set(false);
    active.thumbnail = Set(None);
    let model = active.update(&txn).await?;

    txn.commit().await?;
    info!(
        mod_id = model.id,
        by = auth_user.user_id,
        images_removed = removed.rows_affected,
        "Mod rejected"
    );

    Ok(Json(model.into()))
}

pub(crate) async fn find_mod<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<game_mod::Model, AppError> {
    game_mod::Entity::find()
        .filter(game_mod::Column::Uuid.eq(uuid))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Mod not found".into()))
}

/// Like [`find_mod`], but unapproved mods do not exist for the caller.
pub(crate) async fn find_approved_mod<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<game_mod::Model, AppError> {
    let model = find_mod(db, uuid).await?;
    if !model.approved {
        return Err(AppError::NotFound("Mod not found".into()));
    }
    Ok(model)
}

async fn load_category<C: ConnectionTrait>(
    db: &C,
    id: Option<i32>,
) -> Result<Option<CategoryRules>, AppError> {
    let Some(id) = id else {
        return Ok(None);
    };
    let category = category::Entity::find_by_id(id).one(db).await?;
    Ok(category.as_ref().map(CategoryRules::from))
}

/// Every referenced tag, race and gender must exist.
async fn check_references<C: ConnectionTrait>(
    db: &C,
    tag_ids: &[i32],
    compatibility: &[CompatibilityEntry],
) -> Result<(), AppError> {
    if !tag_ids.is_empty() {
        let found = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids.iter().copied()))
            .count(db)
            .await?;
        expect_all_found(found, tag_ids.len(), "tag")?;
    }

    let race_ids: BTreeSet<i32> = compatibility.iter().map(|c| c.race_id).collect();
    if !race_ids.is_empty() {
        let found = race::Entity::find()
            .filter(race::Column::Id.is_in(race_ids.iter().copied()))
            .count(db)
            .await?;
        expect_all_found(found, race_ids.len(), "race")?;
    }

    let gender_ids: BTreeSet<i32> = compatibility.iter().filter_map(|c| c.gender_id).collect();
    if !gender_ids.is_empty() {
        let found = gender::Entity::find()
            .filter(gender::Column::Id.is_in(gender_ids.iter().copied()))
            .count(db)
            .await?;
        expect_all_found(found, gender_ids.len(), "gender")?;
    }

    Ok(())
}

fn expect_all_found(found: u64, expected: usize, what: &str) -> Result<(), AppError> {
    if found as usize != expected {
        return Err(AppError::Validation(format!(
            "One or more {what} IDs do not exist"
        )));
    }
    Ok(())
}

async fn replace_tags(txn: &DatabaseTransaction, mod_id: i32, tag_ids: &[i32]) -> Result<(), AppError> {
    mod_tag::Entity::delete_many()
        .filter(mod_tag::Column::ModId.eq(mod_id))
        .exec(txn)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }
    let links = tag_ids.iter().map(|&tag_id| mod_tag::ActiveModel {
        mod_id: Set(mod_id),
        tag_id: Set(tag_id),
    });
    mod_tag::Entity::insert_many(links)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn replace_compatibility(
    txn: &DatabaseTransaction,
    mod_id: i32,
    entries: &[CompatibilityEntry],
) -> Result<(), AppError> {
    mod_compatibility::Entity::delete_many()
        .filter(mod_compatibility::Column::ModId.eq(mod_id))
        .exec(txn)
        .await?;

    if entries.is_empty() {
        return Ok(());
    }
    let rows = entries.iter().map(|e| mod_compatibility::ActiveModel {
        mod_id: Set(mod_id),
        race_id: Set(e.race_id),
        gender_id: Set(e.gender_id),
        ..Default::default()
    });
    mod_compatibility::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn page_of_mods(
    db: &DatabaseConnection,
    select: Select<game_mod::Entity>,
    page: Option<u64>,
    per_page: Option<u64>,
) -> Result<ModListResponse, AppError> {
    let (page, per_page) = page_bounds(page, per_page);

    let total = select.clone().paginate(db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(db)
        .await?
        .into_iter()
        .map(ModListItem::from)
        .collect();

    Ok(ModListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    })
}

/// Assemble the detail view of `model` from its related rows.
pub(crate) async fn mod_detail<C: ConnectionTrait>(
    db: &C,
    model: game_mod::Model,
) -> Result<ModResponse, AppError> {
    let category = category::Entity::find_by_id(model.category_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Mod {} references missing category {}",
                model.id, model.category_id
            ))
        })?;

    let tags = tag::Entity::find()
        .filter(
            tag::Column::Id.in_subquery(
                sea_orm::sea_query::Query::select()
                    .column(mod_tag::Column::TagId)
                    .from(mod_tag::Entity)
                    .and_where(mod_tag::Column::ModId.eq(model.id))
                    .to_owned(),
            ),
        )
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|t| NamedRef {
            id: t.id,
            name: t.name,
        })
        .collect();

    let compat_rows = mod_compatibility::Entity::find()
        .filter(mod_compatibility::Column::ModId.eq(model.id))
        .order_by_asc(mod_compatibility::Column::Id)
        .all(db)
        .await?;

    let race_names: HashMap<i32, String> = race::Entity::find()
        .filter(race::Column::Id.is_in(compat_rows.iter().map(|r| r.race_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();
    let gender_names: HashMap<i32, String> = gender::Entity::find()
        .filter(gender::Column::Id.is_in(compat_rows.iter().filter_map(|r| r.gender_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g.name))
        .collect();

    let compatibility = compat_rows
        .iter()
        .map(|row| CompatibilityResponse {
            race: NamedRef {
                id: row.race_id,
                name: race_names.get(&row.race_id).cloned().unwrap_or_default(),
            },
            gender: row.gender_id.map(|id| NamedRef {
                id,
                name: gender_names.get(&id).cloned().unwrap_or_default(),
            }),
        })
        .collect();

    let images = mod_image::Entity::find()
        .filter(mod_image::Column::ModId.eq(model.id))
        .order_by_asc(mod_image::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(ImageResponse::from)
        .collect();

    let scores: Vec<i32> = rating::Entity::find()
        .filter(rating::Column::ModId.eq(model.id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.score)
        .collect();
    let rating = RatingSummary {
        average: (!scores.is_empty())
            .then(|| scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64),
        count: scores.len() as u64,
    };

    Ok(ModResponse {
        uuid: model.uuid,
        title: model.title,
        short_desc: model.short_desc,
        description: model.description,
        version: model.version,
        file_url: model.file_url,
        file_size: model.file_size,
        user_id: model.user_id,
        downloads: model.downloads,
        approved: model.approved,
        thumbnail: model.thumbnail,
        category: NamedRef {
            id: category.id,
            name: category.name,
        },
        tags,
        compatibility,
        images,
        rating,
        upload_date: model.upload_date,
        updated_date: model.updated_date,
    })
}
