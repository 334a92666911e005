use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::reaction::VoterSet;

use crate::models::{NewPhoto, Photo};
use crate::schema::{photos, users};

/// Result of a like toggle, fed back to the caller and into the
/// `photo.liked` event.
#[derive(Debug, Clone, Copy)]
pub struct LikeOutcome {
    pub photo_id: Uuid,
    pub owner_id: Uuid,
    pub is_liked: bool,
    pub like_count: i32,
}

/// Toggle the actor's like on a photo, looked up by URL.
///
/// The photo row is the aggregate: voter-set and count live in the same row
/// and are written together under a row lock, so concurrent toggles on the
/// same photo serialize and the pair cannot diverge.
pub fn toggle_like(pool: &DbPool, actor_id: Uuid, photo_url: &str) -> AppResult<LikeOutcome> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let actor_known: i64 = users::table
            .filter(users::id.eq(actor_id))
            .count()
            .get_result(conn)?;
        if actor_known == 0 {
            return Err(AppError::new(ErrorCode::UserNotFound, "actor not found"));
        }

        let photo: Photo = photos::table
            .filter(photos::url.eq(photo_url))
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::new(ErrorCode::PhotoNotFound, "photo not found")
                }
                other => AppError::Database(other),
            })?;

        let mut voters = VoterSet::from_json(&photo.liked_by);
        let toggle = voters.toggle(actor_id);

        diesel::update(photos::table.find(photo.id))
            .set((
                photos::liked_by.eq(voters.to_json()),
                photos::like_count.eq(toggle.count),
            ))
            .execute(conn)?;

        Ok(LikeOutcome {
            photo_id: photo.id,
            owner_id: photo.user_id,
            is_liked: toggle.reacted,
            like_count: toggle.count,
        })
    })
}

/// Register an already-uploaded photo. The first photo of a user becomes the
/// main photo automatically.
pub fn register_photo(
    pool: &DbPool,
    user_id: Uuid,
    url: &str,
    storage_key: &str,
) -> AppResult<Photo> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let existing: i64 = photos::table
            .filter(photos::user_id.eq(user_id))
            .count()
            .get_result(conn)?;

        let new_photo = NewPhoto {
            user_id,
            url: url.to_string(),
            storage_key: storage_key.to_string(),
            is_main: existing == 0,
            liked_by: serde_json::Value::Array(vec![]),
            like_count: 0,
        };

        let photo = diesel::insert_into(photos::table)
            .values(&new_photo)
            .get_result::<Photo>(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    AppError::new(ErrorCode::PhotoAlreadyExists, "photo url already registered")
                }
                other => AppError::Database(other),
            })?;

        Ok(photo)
    })
}

/// Flag one photo as main, clearing the flag on the user's other photos in
/// the same transaction (at most one main photo per user).
pub fn set_main_photo(pool: &DbPool, user_id: Uuid, photo_id: Uuid) -> AppResult<Photo> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let _photo: Photo = photos::table
            .filter(photos::id.eq(photo_id))
            .filter(photos::user_id.eq(user_id))
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::new(ErrorCode::PhotoNotFound, "photo not found")
                }
                other => AppError::Database(other),
            })?;

        diesel::update(
            photos::table
                .filter(photos::user_id.eq(user_id))
                .filter(photos::is_main.eq(true)),
        )
        .set(photos::is_main.eq(false))
        .execute(conn)?;

        let updated = diesel::update(photos::table.find(photo_id))
            .set(photos::is_main.eq(true))
            .get_result::<Photo>(conn)?;

        Ok(updated)
    })
}

/// Delete a photo (by its storage identifier the caller already knows).
/// Deleting the main photo promotes the oldest remaining one.
pub fn delete_photo(pool: &DbPool, user_id: Uuid, photo_id: Uuid) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let photo: Photo = photos::table
            .filter(photos::id.eq(photo_id))
            .filter(photos::user_id.eq(user_id))
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AppError::new(ErrorCode::PhotoNotFound, "photo not found")
                }
                other => AppError::Database(other),
            })?;

        diesel::delete(photos::table.find(photo.id)).execute(conn)?;

        if photo.is_main {
            let successor: Option<Photo> = photos::table
                .filter(photos::user_id.eq(user_id))
                .order(photos::created_at.asc())
                .first(conn)
                .optional()?;

            if let Some(next) = successor {
                diesel::update(photos::table.find(next.id))
                    .set(photos::is_main.eq(true))
                    .execute(conn)?;
            }
        }

        Ok(())
    })
}

pub fn list_photos(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<Photo>> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let items = photos::table
        .filter(photos::user_id.eq(user_id))
        .order(photos::created_at.asc())
        .load::<Photo>(&mut conn)?;

    Ok(items)
}
