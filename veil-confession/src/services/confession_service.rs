use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::reaction::ReactionLedger;
use veil_shared::types::pagination::PaginationParams;

use crate::models::{Confession, ConfessionCategory, ConfessionView, NewConfession};
use crate::schema::confessions;
use crate::services::member_service;

pub const MAX_CONTENT_CHARS: usize = 1000;

/// Build the anonymized read shape for one viewer. Counts are always
/// recomputed from the voter-sets; the stored count column is a cache for
/// consumers that cannot parse the ledger.
pub fn view_for(confession: &Confession, viewer_id: Uuid) -> ConfessionView {
    let ledger = ReactionLedger::from_json(&confession.reactions);
    let viewer_reactions = veil_shared::reaction::ReactionKind::ALL
        .into_iter()
        .filter(|kind| ledger.contains(*kind, viewer_id))
        .map(|kind| kind.as_str())
        .collect();

    ConfessionView {
        id: confession.id,
        college: confession.college.clone(),
        category: confession.category.clone(),
        content: confession.content.clone(),
        reaction_counts: ledger.counts(),
        viewer_reactions,
        comment_count: confession.comment_count,
        created_at: confession.created_at,
    }
}

/// Create a confession. The owning college is copied from the author at
/// creation time; authorship itself never reaches a read path.
pub fn create_confession(
    pool: &DbPool,
    author_id: Uuid,
    content: &str,
    category: ConfessionCategory,
) -> AppResult<Confession> {
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            format!("content must be 1-{MAX_CONTENT_CHARS} characters"),
        ));
    }

    let author = member_service::get_member(pool, author_id)?;

    let empty = ReactionLedger::new();
    let new_confession = NewConfession {
        author_id,
        college: author.college,
        content: trimmed.to_string(),
        category: category.to_string(),
        reactions: empty.voters_json(),
        reaction_counts: empty.counts_json(),
    };

    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let confession = diesel::insert_into(confessions::table)
        .values(&new_confession)
        .get_result::<Confession>(&mut conn)?;

    Ok(confession)
}

pub fn get_confession(pool: &DbPool, confession_id: Uuid) -> AppResult<Confession> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    confessions::table
        .find(confession_id)
        .first::<Confession>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::ConfessionNotFound, "confession not found"))
}

/// College feed: latest confessions from the viewer's college, optionally
/// narrowed to one category.
pub fn list_feed(
    pool: &DbPool,
    viewer_id: Uuid,
    category: Option<ConfessionCategory>,
    params: &PaginationParams,
) -> AppResult<(Vec<Confession>, u64)> {
    let viewer = member_service::get_member(pool, viewer_id)?;
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mut count_query = confessions::table
        .filter(confessions::college.eq(&viewer.college))
        .into_boxed();
    let mut query = confessions::table
        .filter(confessions::college.eq(&viewer.college))
        .into_boxed();

    if let Some(cat) = category {
        count_query = count_query.filter(confessions::category.eq(cat.as_str()));
        query = query.filter(confessions::category.eq(cat.as_str()));
    }

    let total: i64 = count_query.count().get_result(&mut conn)?;

    let items = query
        .order(confessions::created_at.desc())
        .limit(params.limit() as i64)
        .offset(params.offset() as i64)
        .load::<Confession>(&mut conn)?;

    Ok((items, total as u64))
}

/// Flag a confession for moderation. Advisory metadata only: a flagged
/// confession keeps accepting reactions and comments. Repeat reports from
/// the same user collapse into one entry.
pub fn report_confession(
    pool: &DbPool,
    confession_id: Uuid,
    reporter_id: Uuid,
    reason: &str,
) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let confession: Confession = confessions::table
            .find(confession_id)
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::new(ErrorCode::ConfessionNotFound, "confession not found")
                }
                other => AppError::Database(other),
            })?;

        if confession.author_id == reporter_id {
            return Err(AppError::new(
                ErrorCode::SelfReport,
                "you cannot report your own confession",
            ));
        }

        let mut reports = confession
            .reports
            .as_array()
            .cloned()
            .unwrap_or_default();

        let already_reported = reports.iter().any(|entry| {
            entry.get("reporter_id").and_then(|v| v.as_str())
                == Some(reporter_id.to_string().as_str())
        });

        if !already_reported {
            reports.push(json!({
                "reporter_id": reporter_id.to_string(),
                "reason": reason,
                "at": chrono::Utc::now(),
            }));
        }

        diesel::update(confessions::table.find(confession.id))
            .set((
                confessions::is_reported.eq(true),
                confessions::reports.eq(serde_json::Value::Array(reports)),
            ))
            .execute(conn)?;

        Ok(())
    })
}
