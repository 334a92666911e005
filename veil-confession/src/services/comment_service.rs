use std::collections::HashMap;

use diesel::prelude::*;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Comment, CommentView, Confession, Member, NewComment};
use crate::schema::{comments, confessions, members};

pub const MAX_COMMENT_CHARS: usize = 500;

fn validate_content(content: &str) -> AppResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::new(
            ErrorCode::ValidationError,
            format!("content must be 1-{MAX_COMMENT_CHARS} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// The inserted comment plus what the caller needs to publish the
/// comment.added event without leaking authorship.
#[derive(Debug)]
pub struct CommentOutcome {
    pub comment: Comment,
    pub confession_author_id: Uuid,
    pub author_name: Option<String>,
}

/// Append a top-level comment and bump the denormalized comment count in the
/// same transaction. Replies do not pass through here.
pub fn add_comment(
    pool: &DbPool,
    confession_id: Uuid,
    author_id: Uuid,
    content: &str,
    is_anonymous: bool,
) -> AppResult<CommentOutcome> {
    let content = validate_content(content)?;
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let author: Member = members::table
            .find(author_id)
            .first(conn)
            .map_err(|_| AppError::new(ErrorCode::UserNotFound, "author not found"))?;

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

        let comment = diesel::insert_into(comments::table)
            .values(&NewComment {
                confession_id,
                parent_id: None,
                author_id,
                content,
                is_anonymous,
            })
            .get_result::<Comment>(conn)?;

        diesel::update(confessions::table.find(confession.id))
            .set(confessions::comment_count.eq(confessions::comment_count + 1))
            .execute(conn)?;

        Ok(CommentOutcome {
            comment,
            confession_author_id: confession.author_id,
            author_name: if is_anonymous { None } else { author.name },
        })
    })
}

/// Append a reply under a top-level comment. Replies nest exactly one level:
/// replying to a reply is rejected. The confession-level comment count is
/// not touched.
pub fn add_reply(
    pool: &DbPool,
    confession_id: Uuid,
    parent_comment_id: Uuid,
    author_id: Uuid,
    content: &str,
    is_anonymous: bool,
) -> AppResult<CommentOutcome> {
    let content = validate_content(content)?;
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let author: Member = members::table
            .find(author_id)
            .first(conn)
            .map_err(|_| AppError::new(ErrorCode::UserNotFound, "author not found"))?;

        let confession: Confession = confessions::table
            .find(confession_id)
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::new(ErrorCode::ConfessionNotFound, "confession not found")
                }
                other => AppError::Database(other),
            })?;

        let parent: Comment = comments::table
            .filter(comments::id.eq(parent_comment_id))
            .filter(comments::confession_id.eq(confession_id))
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::new(ErrorCode::CommentNotFound, "comment not found")
                }
                other => AppError::Database(other),
            })?;

        if parent.parent_id.is_some() {
            return Err(AppError::new(
                ErrorCode::CannotReplyToReply,
                "replies cannot be nested further",
            ));
        }

        let reply = diesel::insert_into(comments::table)
            .values(&NewComment {
                confession_id,
                parent_id: Some(parent.id),
                author_id,
                content,
                is_anonymous,
            })
            .get_result::<Comment>(conn)?;

        Ok(CommentOutcome {
            comment: reply,
            confession_author_id: confession.author_id,
            author_name: if is_anonymous { None } else { author.name },
        })
    })
}

/// Load the two-level comment tree, oldest first at both levels. Author ids
/// stay server-side; display names appear only for non-anonymous authors.
pub fn list_comments(pool: &DbPool, confession_id: Uuid) -> AppResult<Vec<CommentView>> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let exists: i64 = confessions::table
        .filter(confessions::id.eq(confession_id))
        .count()
        .get_result(&mut conn)?;
    if exists == 0 {
        return Err(AppError::new(ErrorCode::ConfessionNotFound, "confession not found"));
    }

    let rows: Vec<Comment> = comments::table
        .filter(comments::confession_id.eq(confession_id))
        .order(comments::created_at.asc())
        .load(&mut conn)?;

    let named_authors: Vec<Uuid> = rows
        .iter()
        .filter(|c| !c.is_anonymous)
        .map(|c| c.author_id)
        .collect();

    let names: HashMap<Uuid, Option<String>> = members::table
        .filter(members::id.eq_any(&named_authors))
        .load::<Member>(&mut conn)?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let to_view = |comment: &Comment, replies: Vec<CommentView>| CommentView {
        id: comment.id,
        content: comment.content.clone(),
        is_anonymous: comment.is_anonymous,
        author_name: if comment.is_anonymous {
            None
        } else {
            names.get(&comment.author_id).cloned().flatten()
        },
        created_at: comment.created_at,
        replies,
    };

    let mut replies_by_parent: HashMap<Uuid, Vec<&Comment>> = HashMap::new();
    for row in rows.iter().filter(|c| c.parent_id.is_some()) {
        if let Some(parent_id) = row.parent_id {
            replies_by_parent.entry(parent_id).or_default().push(row);
        }
    }

    let tree = rows
        .iter()
        .filter(|c| c.parent_id.is_none())
        .map(|comment| {
            let replies = replies_by_parent
                .get(&comment.id)
                .map(|children| {
                    children.iter().copied().map(|reply| to_view(reply, vec![])).collect()
                })
                .unwrap_or_default();
            to_view(comment, replies)
        })
        .collect();

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_bounds() {
        assert!(validate_content("").is_err());
        assert!(validate_content("   ").is_err());
        assert!(validate_content("hello").is_ok());
        assert!(validate_content(&"x".repeat(MAX_COMMENT_CHARS)).is_ok());
        assert!(validate_content(&"x".repeat(MAX_COMMENT_CHARS + 1)).is_err());
    }

    #[test]
    fn content_is_trimmed_before_length_check() {
        let padded = format!("  {}  ", "x".repeat(MAX_COMMENT_CHARS));
        assert!(validate_content(&padded).is_ok());
    }

    #[test]
    fn multibyte_content_is_counted_in_chars() {
        // 500 emoji are 500 chars even though they are 2000 bytes.
        let emoji = "🦀".repeat(MAX_COMMENT_CHARS);
        assert!(validate_content(&emoji).is_ok());
        let over = "🦀".repeat(MAX_COMMENT_CHARS + 1);
        assert!(validate_content(&over).is_err());
    }
}
