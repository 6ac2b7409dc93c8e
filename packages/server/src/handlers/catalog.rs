use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{category, gender, race, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::catalog::{
    CategoryResponse, CreateCategoryRequest, CreateNamedRequest, LookupResponse, validate_name,
};
use crate::models::role::Permission;
use crate::state::AppState;
use crate::validation::limits::{CATEGORY_NAME_MAX, GENDER_NAME_MAX, RACE_NAME_MAX, TAG_NAME_MAX};

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Catalog",
    operation_id = "listCategories",
    summary = "List categories",
    responses((status = 200, description = "All categories by name", body = Vec<CategoryResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Catalog",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Names are unique and cannot be changed later. Requires `catalog:manage` permission.",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Name out of bounds (INVALID_FIELD_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name taken (DUPLICATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(Permission::CatalogManage)?;
    let name = validate_name("Category name", &payload.name, CATEGORY_NAME_MAX)?;

    let model = category::ActiveModel {
        name: Set(name),
        requires_race: Set(payload.requires_race),
        requires_gender: Set(payload.requires_gender),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::from_write(e, "category"))?;

    info!(category_id = model.id, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "Catalog",
    operation_id = "listTags",
    summary = "List tags",
    responses((status = 200, description = "All tags by name", body = Vec<LookupResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<LookupResponse>>, AppError> {
    let rows = tag::Entity::find()
        .order_by_asc(tag::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    tag = "Catalog",
    operation_id = "createTag",
    summary = "Create a tag",
    description = "Any user allowed to upload mods may add tags. Requires `mod:create` permission.",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Tag created", body = LookupResponse),
        (status = 400, description = "Name out of bounds (INVALID_FIELD_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Name taken (DUPLICATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_tag(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNamedRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(Permission::ModCreate)?;
    let name = validate_name("Tag name", &payload.name, TAG_NAME_MAX)?;

    let model = tag::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::from_write(e, "tag"))?;

    Ok((StatusCode::CREATED, Json(LookupResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/v1/races",
    tag = "Catalog",
    operation_id = "listRaces",
    summary = "List races",
    responses((status = 200, description = "All races by name", body = Vec<LookupResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_races(
    State(state): State<AppState>,
) -> Result<Json<Vec<LookupResponse>>, AppError> {
    let rows = race::Entity::find()
        .order_by_asc(race::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/races",
    tag = "Catalog",
    operation_id = "createRace",
    summary = "Create a race",
    description = "Requires `catalog:manage` permission.",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Race created", body = LookupResponse),
        (status = 400, description = "Name out of bounds (INVALID_FIELD_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name taken (DUPLICATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_race(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNamedRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(Permission::CatalogManage)?;
    let name = validate_name("Race name", &payload.name, RACE_NAME_MAX)?;

    let model = race::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::from_write(e, "race"))?;

    Ok((StatusCode::CREATED, Json(LookupResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/v1/genders",
    tag = "Catalog",
    operation_id = "listGenders",
    summary = "List genders",
    responses((status = 200, description = "All genders by name", body = Vec<LookupResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_genders(
    State(state): State<AppState>,
) -> Result<Json<Vec<LookupResponse>>, AppError> {
    let rows = gender::Entity::find()
        .order_by_asc(gender::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/genders",
    tag = "Catalog",
    operation_id = "createGender",
    summary = "Create a gender",
    description = "Requires `catalog:manage` permission.",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Gender created", body = LookupResponse),
        (status = 400, description = "Name out of bounds (INVALID_FIELD_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name taken (DUPLICATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_gender(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateNamedRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(Permission::CatalogManage)?;
    let name = validate_name("Gender name", &payload.name, GENDER_NAME_MAX)?;

    let model = gender::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::from_write(e, "gender"))?;

    Ok((StatusCode::CREATED, Json(LookupResponse::from(model))))
}
