use diesel::prelude::*;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Member, NewMember};
use crate::schema::members;

/// Seed the mirror from a registration event. Replays are harmless: a row
/// already refreshed by a profile update is left untouched.
pub fn seed_member(pool: &DbPool, user_id: Uuid, college: &str) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    diesel::insert_into(members::table)
        .values(&NewMember {
            id: user_id,
            name: None,
            college: college.to_string(),
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    Ok(())
}

/// Upsert the local user mirror from profile events.
pub fn upsert_member(
    pool: &DbPool,
    user_id: Uuid,
    name: Option<&str>,
    college: &str,
) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let row = NewMember {
        id: user_id,
        name: name.map(str::to_string),
        college: college.to_string(),
    };

    diesel::insert_into(members::table)
        .values(&row)
        .on_conflict(members::id)
        .do_update()
        .set((
            members::name.eq(&row.name),
            members::college.eq(&row.college),
            members::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(&mut conn)?;

    Ok(())
}

pub fn get_member(pool: &DbPool, user_id: Uuid) -> AppResult<Member> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    members::table
        .find(user_id)
        .first::<Member>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))
}
