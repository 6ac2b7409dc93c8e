use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{comment, download, game_mod, rating};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::feedback::{
    CommentResponse, CreateCommentRequest, RateModRequest, RatingResponse, validate_comment,
    validate_rating,
};
use crate::models::mods::DownloadResponse;
use crate::models::role::Permission;
use crate::state::AppState;

use super::mods::find_approved_mod;

#[utoipa::path(
    get,
    path = "/api/v1/mods/{uuid}/comments",
    tag = "Feedback",
    operation_id = "listComments",
    summary = "Comments on an approved mod",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<CommentResponse>),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(uuid = %uuid))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let parent = find_approved_mod(&state.db, uuid).await?;
    let rows = comment::Entity::find()
        .filter(comment::Column::ModId.eq(parent.id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/comments",
    tag = "Feedback",
    operation_id = "addComment",
    summary = "Comment on a mod",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment stored", body = CommentResponse),
        (status = 400, description = "Text out of bounds (INVALID_FIELD_LENGTH)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(uuid = %uuid, user_id = auth_user.user_id))]
pub async fn add_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(Permission::ModCreate)?;
    validate_comment(&payload)?;

    let parent = find_approved_mod(&state.db, uuid).await?;
    let model = comment::ActiveModel {
        text: Set(payload.text.trim().to_string()),
        mod_id: Set(parent.id),
        user_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/ratings",
    tag = "Feedback",
    operation_id = "rateMod",
    summary = "Rate a mod",
    description = "Stores the caller's 1-5 rating. Rating the same mod again replaces the earlier score.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    request_body = RateModRequest,
    responses(
        (status = 200, description = "Rating stored", body = RatingResponse),
        (status = 400, description = "Score out of range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(uuid = %uuid, user_id = auth_user.user_id))]
pub async fn rate_mod(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
    AppJson(payload): AppJson<RateModRequest>,
) -> Result<Json<RatingResponse>, AppError> {
    auth_user.require_permission(Permission::ModCreate)?;
    validate_rating(&payload)?;

    let txn = state.db.begin().await?;

    let parent = find_approved_mod(&txn, uuid).await?;
    let now = chrono::Utc::now();
    let row = rating::ActiveModel {
        mod_id: Set(parent.id),
        user_id: Set(auth_user.user_id),
        score: Set(payload.score),
        created_at: Set(now),
        updated_at: Set(now),
    };

    rating::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([rating::Column::ModId, rating::Column::UserId])
                .update_columns([rating::Column::Score, rating::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let stored = rating::Entity::find_by_id((parent.id, auth_user.user_id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Internal("Rating vanished after upsert".into()))?;

    txn.commit().await?;
    Ok(Json(stored.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/mods/{uuid}/downloads",
    tag = "Feedback",
    operation_id = "downloadMod",
    summary = "Record a download",
    description = "Logs a download by the caller, bumps the mod's counter and returns the archive URL.",
    params(("uuid" = Uuid, Path, description = "Mod UUID")),
    responses(
        (status = 200, description = "Download recorded", body = DownloadResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Mod not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(uuid = %uuid, user_id = auth_user.user_id))]
pub async fn record_download(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<DownloadResponse>, AppError> {
    let txn = state.db.begin().await?;

    let parent = find_approved_mod(&txn, uuid).await?;

    download::ActiveModel {
        mod_id: Set(parent.id),
        user_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // Incremented in SQL so concurrent downloads are not lost.
    game_mod::Entity::update_many()
        .col_expr(game_mod::Column::Downloads, Expr::cust("\"downloads\" + 1"))
        .filter(game_mod::Column::Id.eq(parent.id))
        .exec(&txn)
        .await?;

    let downloads = game_mod::Entity::find_by_id(parent.id)
        .one(&txn)
        .await?
        .map(|m| m.downloads)
        .ok_or_else(|| AppError::NotFound("Mod not found".into()))?;

    txn.commit().await?;

    Ok(Json(DownloadResponse {
        uuid: parent.uuid,
        file_url: parent.file_url,
        downloads,
    }))
}
