use diesel::prelude::*;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewUser, UpdateUser, User};
use crate::schema::users;

/// Create the user row when the external auth provider reports a
/// registration. Idempotent: a replayed event leaves the existing row alone.
pub fn create_user(pool: &DbPool, user_id: Uuid, email: &str, college: &str) -> AppResult<User> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    if let Some(existing) = users::table
        .find(user_id)
        .first::<User>(&mut conn)
        .optional()?
    {
        tracing::debug!(user_id = %user_id, "registration event replayed, user exists");
        return Ok(existing);
    }

    let new_user = NewUser {
        id: user_id,
        email: email.to_lowercase(),
        college: college.to_string(),
    };

    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result::<User>(&mut conn)?;

    Ok(user)
}

pub fn get_user(pool: &DbPool, user_id: Uuid) -> AppResult<User> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    users::table
        .find(user_id)
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))
}

pub fn update_profile(pool: &DbPool, user_id: Uuid, changes: UpdateUser) -> AppResult<User> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let user = users::table
        .find(user_id)
        .first::<User>(&mut conn)
        .map_err(|_| AppError::new(ErrorCode::UserNotFound, "user not found"))?;

    let updated = diesel::update(users::table.find(user.id))
        .set((&changes, users::updated_at.eq(chrono::Utc::now())))
        .get_result::<User>(&mut conn)?;

    Ok(updated)
}
