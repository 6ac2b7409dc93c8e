use anyhow::Context;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::*;
use tracing::info;

use crate::config::AdminAccount;
use crate::entity::{game_mod, mod_compatibility, mod_image, mod_tag, user};
use crate::models::role::Role;
use crate::utils::hash;

/// Ensure the secondary indexes used by search and detail queries exist.
///
/// Entity-derived tables only carry primary keys and unique columns, so the
/// lookup indexes are created here on startup.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let indexes: Vec<(&str, IndexCreateStatement)> = vec![
        // Approved listing, newest first.
        (
            "idx_game_mod_approved_upload",
            Index::create()
                .if_not_exists()
                .name("idx_game_mod_approved_upload")
                .table(game_mod::Entity)
                .col(game_mod::Column::Approved)
                .col(game_mod::Column::UploadDate)
                .to_owned(),
        ),
        (
            "idx_mod_tag_tag",
            Index::create()
                .if_not_exists()
                .name("idx_mod_tag_tag")
                .table(mod_tag::Entity)
                .col(mod_tag::Column::TagId)
                .to_owned(),
        ),
        (
            "idx_mod_compatibility_race",
            Index::create()
                .if_not_exists()
                .name("idx_mod_compatibility_race")
                .table(mod_compatibility::Entity)
                .col(mod_compatibility::Column::RaceId)
                .col(mod_compatibility::Column::ModId)
                .to_owned(),
        ),
        (
            "idx_mod_compatibility_gender",
            Index::create()
                .if_not_exists()
                .name("idx_mod_compatibility_gender")
                .table(mod_compatibility::Entity)
                .col(mod_compatibility::Column::GenderId)
                .col(mod_compatibility::Column::ModId)
                .to_owned(),
        ),
        (
            "idx_mod_image_mod",
            Index::create()
                .if_not_exists()
                .name("idx_mod_image_mod")
                .table(mod_image::Entity)
                .col(mod_image::Column::ModId)
                .to_owned(),
        ),
    ];

    let backend = db.get_database_backend();
    for (name, stmt) in indexes {
        match db.execute_raw(backend.build(&stmt)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}

/// Create the configured administrator unless the username is already taken.
pub async fn bootstrap_admin<C: ConnectionTrait>(
    db: &C,
    admin: &AdminAccount,
) -> anyhow::Result<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&admin.username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let password = hash::hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to hash admin password")?;

    user::ActiveModel {
        username: Set(admin.username.clone()),
        email: Set(admin.email.trim().to_lowercase()),
        password: Set(password),
        role: Set(Role::Admin.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created administrator account '{}'", admin.username);
    Ok(())
}
