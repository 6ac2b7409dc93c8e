//! Keeps `game_mod.thumbnail` in step with the image flagged as thumbnail.

/// The parts of a stored image the planner looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageState {
    pub id: i32,
    pub url: String,
    pub is_thumbnail: bool,
}

/// What to write when a new image is attached to a mod.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailPlan {
    /// Value to store in the new image's `is_thumbnail` column.
    pub is_thumbnail: bool,
    /// Existing images that lose their thumbnail flag.
    pub demote: Vec<i32>,
    /// Whether `game_mod.thumbnail` must be pointed at the new image.
    pub update_mod: bool,
}

/// What to write once an image has been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalPlan {
    /// A thumbnail still exists; nothing changes.
    Keep,
    /// Flag this image and mirror its URL on the mod.
    Promote { id: i32, url: String },
    /// No thumbnail remains; the mod's thumbnail becomes NULL.
    Clear,
}

/// Plan the thumbnail bookkeeping for an image about to be inserted.
///
/// `existing` holds the images the mod already has. The most recently
/// flagged image always wins, and a mod's first image becomes its
/// thumbnail even when it was not flagged.
pub fn plan_new_image(existing: &[ImageState], requested: bool) -> ThumbnailPlan {
    if requested {
        ThumbnailPlan {
            is_thumbnail: true,
            demote: existing
                .iter()
                .filter(|img| img.is_thumbnail)
                .map(|img| img.id)
                .collect(),
            update_mod: true,
        }
    } else if existing.is_empty() {
        ThumbnailPlan {
            is_thumbnail: true,
            demote: Vec::new(),
            update_mod: true,
        }
    } else {
        ThumbnailPlan::default()
    }
}

/// Plan the thumbnail bookkeeping after one or more images were deleted.
///
/// A lone survivor is promoted, mirroring the single-image rule used on insert.
pub fn plan_after_removal(remaining: &[ImageState]) -> RemovalPlan {
    if remaining.iter().any(|img| img.is_thumbnail) {
        return RemovalPlan::Keep;
    }
    match remaining {
        [only] => RemovalPlan::Promote {
            id: only.id,
            url: only.url.clone(),
        },
        _ => RemovalPlan::Clear,
    }
}
