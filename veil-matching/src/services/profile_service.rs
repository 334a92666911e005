use diesel::prelude::*;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewProfile, Profile};
use crate::schema::profiles;

/// Seed the mirror from a registration event. Replays never clobber a row
/// already refreshed by a profile update.
pub fn seed_profile(pool: &DbPool, user_id: Uuid, college: &str) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    diesel::insert_into(profiles::table)
        .values(&NewProfile {
            id: user_id,
            name: None,
            college: college.to_string(),
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    Ok(())
}

pub fn upsert_profile(
    pool: &DbPool,
    user_id: Uuid,
    name: Option<&str>,
    college: &str,
) -> AppResult<()> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let row = NewProfile {
        id: user_id,
        name: name.map(str::to_string),
        college: college.to_string(),
    };

    diesel::insert_into(profiles::table)
        .values(&row)
        .on_conflict(profiles::id)
        .do_update()
        .set((
            profiles::name.eq(&row.name),
            profiles::college.eq(&row.college),
            profiles::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(&mut conn)?;

    Ok(())
}

pub fn get_profile(pool: &DbPool, user_id: Uuid) -> AppResult<Profile> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    profiles::table
        .find(user_id)
        .first::<Profile>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))
}
