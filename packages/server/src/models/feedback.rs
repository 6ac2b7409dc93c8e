use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{comment, rating};
use crate::error::AppError;
use crate::validation::check_length;
use crate::validation::limits::{COMMENT_MAX, RATING_MAX, RATING_MIN};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    #[schema(example = "Works great with the latest patch.")]
    pub text: String,
}

pub fn validate_comment(req: &CreateCommentRequest) -> Result<(), AppError> {
    check_length("Comment", &req.text, 1, COMMENT_MAX)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            text: m.text,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RateModRequest {
    /// 1-5 stars.
    #[schema(example = 5)]
    pub score: i32,
}

pub fn validate_rating(req: &RateModRequest) -> Result<(), AppError> {
    if !(RATING_MIN..=RATING_MAX).contains(&req.score) {
        return Err(AppError::Validation(format!(
            "Rating must be {RATING_MIN}-{RATING_MAX}"
        )));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RatingResponse {
    pub score: i32,
    pub user_id: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<rating::Model> for RatingResponse {
    fn from(m: rating::Model) -> Self {
        Self {
            score: m.score,
            user_id: m.user_id,
            updated_at: m.updated_at,
        }
    }
}
