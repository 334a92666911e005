use diesel::prelude::*;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};
use veil_shared::reaction::{ReactionCounts, ReactionKind, ReactionLedger};

use crate::models::Confession;
use crate::schema::{confessions, members};

/// Result of one reaction toggle.
#[derive(Debug, Clone, Copy)]
pub struct ReactOutcome {
    pub confession_id: Uuid,
    pub author_id: Uuid,
    pub actor_id: Uuid,
    pub kind: ReactionKind,
    pub reacted: bool,
    pub counts: ReactionCounts,
}

/// Toggle the actor's reaction of the given kind on a confession.
///
/// The confession row is locked for the duration, so racing toggles from
/// different actors serialize per confession and the voter-set and the
/// denormalized counts are always written together. The call either fully
/// applies or rolls back; there is no partial state to retry.
pub fn toggle_reaction(
    pool: &DbPool,
    confession_id: Uuid,
    actor_id: Uuid,
    kind: ReactionKind,
) -> AppResult<ReactOutcome> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let actor_known: i64 = members::table
            .filter(members::id.eq(actor_id))
            .count()
            .get_result(conn)?;
        if actor_known == 0 {
            return Err(AppError::new(ErrorCode::UserNotFound, "actor not found"));
        }

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

        let mut ledger = ReactionLedger::from_json(&confession.reactions);
        let toggle = ledger.toggle(kind, actor_id);

        diesel::update(confessions::table.find(confession.id))
            .set((
                confessions::reactions.eq(ledger.voters_json()),
                confessions::reaction_counts.eq(ledger.counts_json()),
            ))
            .execute(conn)?;

        tracing::debug!(
            confession_id = %confession.id,
            kind = %kind,
            reacted = toggle.reacted,
            count = toggle.count,
            "reaction toggled"
        );

        Ok(ReactOutcome {
            confession_id: confession.id,
            author_id: confession.author_id,
            actor_id,
            kind,
            reacted: toggle.reacted,
            counts: ledger.counts(),
        })
    })
}
