//! Translates catalog search parameters into a query over approved mods.

use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;

use crate::entity::{game_mod, mod_compatibility, mod_tag};
use crate::error::AppError;
use crate::models::mods::ModSearchQuery;
use crate::models::shared::{escape_like, parse_id_list};

/// Longest title fragment accepted as a search term.
const MAX_TITLE_TERM: usize = 120;
/// Cap on the entries of each list-valued filter.
const MAX_FILTER_IDS: usize = 50;

/// Parsed search filters. Every supplied filter must match (AND); IDs within
/// one list are alternatives (OR).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModFilter {
    pub category_id: Option<i32>,
    pub tag_ids: Vec<i32>,
    /// Lowercased, not yet escaped.
    pub title: Option<String>,
    pub user_id: Option<i32>,
    pub race_ids: Vec<i32>,
    pub gender_ids: Vec<i32>,
}

impl TryFrom<&ModSearchQuery> for ModFilter {
    type Error = AppError;

    fn try_from(query: &ModSearchQuery) -> Result<Self, Self::Error> {
        let title = query
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        if let Some(ref t) = title
            && t.chars().count() > MAX_TITLE_TERM
        {
            return Err(AppError::Validation(format!(
                "title filter must be at most {MAX_TITLE_TERM} characters"
            )));
        }

        let filter = ModFilter {
            category_id: query.category_id,
            tag_ids: parse_id_list(query.tag_ids.as_deref(), "tag_ids")?,
            title,
            user_id: query.user_id,
            race_ids: parse_id_list(query.race_ids.as_deref(), "race_ids")?,
            gender_ids: parse_id_list(query.gender_ids.as_deref(), "gender_ids")?,
        };

        for (name, ids) in [
            ("tag_ids", &filter.tag_ids),
            ("race_ids", &filter.race_ids),
            ("gender_ids", &filter.gender_ids),
        ] {
            if ids.len() > MAX_FILTER_IDS {
                return Err(AppError::Validation(format!(
                    "{name} accepts at most {MAX_FILTER_IDS} IDs"
                )));
            }
        }

        Ok(filter)
    }
}

impl ModFilter {
    /// Narrow `select` by every supplied filter. Does not touch approval.
    pub fn apply(&self, mut select: Select<game_mod::Entity>) -> Select<game_mod::Entity> {
        if let Some(category_id) = self.category_id {
            select = select.filter(game_mod::Column::CategoryId.eq(category_id));
        }

        if let Some(user_id) = self.user_id {
            select = select.filter(game_mod::Column::UserId.eq(user_id));
        }

        if let Some(ref title) = self.title {
            let term = escape_like(title);
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(game_mod::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term)).escape('\\')),
            );
        }

        if !self.tag_ids.is_empty() {
            select = select.filter(
                game_mod::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(mod_tag::Column::ModId)
                        .from(mod_tag::Entity)
                        .and_where(mod_tag::Column::TagId.is_in(self.tag_ids.clone()))
                        .to_owned(),
                ),
            );
        }

        if !self.race_ids.is_empty() {
            select = select.filter(
                game_mod::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(mod_compatibility::Column::ModId)
                        .from(mod_compatibility::Entity)
                        .and_where(mod_compatibility::Column::RaceId.is_in(self.race_ids.clone()))
                        .to_owned(),
                ),
            );
        }

        // Rows with a NULL gender do not count as a match for any gender.
        if !self.gender_ids.is_empty() {
            select = select.filter(
                game_mod::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(mod_compatibility::Column::ModId)
                        .from(mod_compatibility::Entity)
                        .and_where(
                            mod_compatibility::Column::GenderId.is_in(self.gender_ids.clone()),
                        )
                        .to_owned(),
                ),
            );
        }

        select
    }
}

/// Approved mods matching `filter`, newest first.
pub fn approved_mods(filter: &ModFilter) -> Select<game_mod::Entity> {
    filter
        .apply(game_mod::Entity::find().filter(game_mod::Column::Approved.eq(true)))
        .order_by_desc(game_mod::Column::UploadDate)
        .order_by_desc(game_mod::Column::Id)
}
