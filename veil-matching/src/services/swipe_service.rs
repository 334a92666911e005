use diesel::prelude::*;
use diesel::sql_types::BigInt;
use uuid::Uuid;

use veil_shared::clients::db::DbPool;
use veil_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Match, MatchView, NewMatch, NewSwipe, Profile, Swipe, SwipeAction};
use crate::schema::{matches, profiles, swipes};

/// Order a pair of user ids canonically so both swipe directions map to the
/// same match row.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b { (a, b) } else { (b, a) }
}

/// Whether two stored actions form a match.
pub fn is_mutual(mine: SwipeAction, theirs: Option<SwipeAction>) -> bool {
    mine.is_positive() && theirs.is_some_and(|t| t.is_positive())
}

/// Advisory-lock key for an unordered pair. FNV-1a over the canonicalized
/// ids, so both swipe directions map to the same key.
fn pair_lock_key(a: Uuid, b: Uuid) -> i64 {
    let (lo, hi) = canonical_pair(a, b);
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in lo.as_bytes().iter().chain(hi.as_bytes()) {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash as i64
}

#[derive(Debug)]
pub struct SwipeOutcome {
    pub swipe: Swipe,
    pub matched: Option<Match>,
    pub is_new_match: bool,
}

/// Record a swipe, overwriting any previous swipe by the same user on the
/// same target, and create the match when the like is mutual.
///
/// The match insert rides on the canonical-pair unique constraint: when two
/// reciprocal likes race, exactly one insert wins and the loser reads the
/// winner's row back. A later pass never deletes a match; matches are
/// terminal once created.
pub fn record_swipe(
    pool: &DbPool,
    swiper_id: Uuid,
    target_id: Uuid,
    action: SwipeAction,
) -> AppResult<SwipeOutcome> {
    if swiper_id == target_id {
        return Err(AppError::new(ErrorCode::SelfSwipe, "you cannot swipe on yourself"));
    }

    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    conn.transaction::<_, AppError, _>(|conn| {
        let known: i64 = profiles::table
            .filter(profiles::id.eq_any([swiper_id, target_id]))
            .count()
            .get_result(conn)?;
        if known != 2 {
            return Err(AppError::new(ErrorCode::UserNotFound, "swiper or target unknown"));
        }

        // Racing reciprocal swipes run in separate transactions against
        // different swipe rows, and a snapshot taken before the peer commits
        // would miss its like in both directions. The pair-scoped advisory
        // lock holds the later transaction here until the earlier one
        // commits, so the reciprocal read below always sees the peer's
        // committed decision. Released automatically at transaction end.
        diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
            .bind::<BigInt, _>(pair_lock_key(swiper_id, target_id))
            .execute(conn)?;

        let swipe: Swipe = diesel::insert_into(swipes::table)
            .values(&NewSwipe {
                swiper_id,
                target_id,
                action: action.to_string(),
            })
            .on_conflict((swipes::swiper_id, swipes::target_id))
            .do_update()
            .set((
                swipes::action.eq(action.as_str()),
                swipes::updated_at.eq(chrono::Utc::now()),
            ))
            .get_result(conn)?;

        if !action.is_positive() {
            return Ok(SwipeOutcome { swipe, matched: None, is_new_match: false });
        }

        let reciprocal: Option<Swipe> = swipes::table
            .filter(swipes::swiper_id.eq(target_id))
            .filter(swipes::target_id.eq(swiper_id))
            .first(conn)
            .optional()?;

        let theirs = reciprocal.and_then(|s| s.action.parse::<SwipeAction>().ok());
        if !is_mutual(action, theirs) {
            return Ok(SwipeOutcome { swipe, matched: None, is_new_match: false });
        }

        let (user_a_id, user_b_id) = canonical_pair(swiper_id, target_id);

        let inserted: Option<Match> = diesel::insert_into(matches::table)
            .values(&NewMatch { user_a_id, user_b_id })
            .on_conflict_do_nothing()
            .get_result(conn)
            .optional()?;

        let (matched, is_new_match) = match inserted {
            Some(m) => (m, true),
            None => {
                let existing: Match = matches::table
                    .filter(matches::user_a_id.eq(user_a_id))
                    .filter(matches::user_b_id.eq(user_b_id))
                    .first(conn)?;
                (existing, false)
            }
        };

        tracing::info!(
            match_id = %matched.id,
            is_new = is_new_match,
            "mutual like resolved"
        );

        Ok(SwipeOutcome { swipe, matched: Some(matched), is_new_match })
    })
}

/// All matches involving the user, newest first, with partner names resolved
/// from the profile mirror.
pub fn list_matches(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<MatchView>> {
    let mut conn = pool.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows: Vec<Match> = matches::table
        .filter(matches::user_a_id.eq(user_id).or(matches::user_b_id.eq(user_id)))
        .order(matches::created_at.desc())
        .load(&mut conn)?;

    let partner_ids: Vec<Uuid> = rows
        .iter()
        .map(|m| if m.user_a_id == user_id { m.user_b_id } else { m.user_a_id })
        .collect();

    let partners: std::collections::HashMap<Uuid, Option<String>> = profiles::table
        .filter(profiles::id.eq_any(&partner_ids))
        .load::<Profile>(&mut conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|m| {
            let partner_id = if m.user_a_id == user_id { m.user_b_id } else { m.user_a_id };
            MatchView {
                id: m.id,
                partner_id,
                partner_name: partners.get(&partner_id).cloned().flatten(),
                created_at: m.created_at,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn canonical_pair_is_direction_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(canonical_pair(a, b), canonical_pair(b, a));
        let (lo, hi) = canonical_pair(a, b);
        assert!(lo < hi);
    }

    #[test]
    fn pair_lock_key_is_direction_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert_eq!(pair_lock_key(a, b), pair_lock_key(b, a));
        assert_ne!(pair_lock_key(a, b), pair_lock_key(a, c));
    }

    #[test]
    fn self_swipe_is_rejected_before_any_query() {
        use diesel::r2d2::{ConnectionManager, Pool};
        use veil_shared::errors::ErrorCode;

        // The guard fires before the pool hands out a connection, so an
        // unconnected pool is enough.
        let manager = ConnectionManager::<diesel::PgConnection>::new("postgres://localhost/unused");
        let pool = Pool::builder().build_unchecked(manager);

        let id = Uuid::new_v4();
        let err = record_swipe(&pool, id, id, SwipeAction::Like).unwrap_err();
        assert!(matches!(
            err,
            AppError::Known { code: ErrorCode::SelfSwipe, .. }
        ));
    }

    #[test]
    fn mutual_requires_two_positives() {
        use SwipeAction::*;
        assert!(is_mutual(Like, Some(Like)));
        assert!(is_mutual(Superlike, Some(Like)));
        assert!(is_mutual(Like, Some(Superlike)));
        assert!(!is_mutual(Like, Some(Pass)));
        assert!(!is_mutual(Pass, Some(Like)));
        assert!(!is_mutual(Like, None));
    }

    /// In-memory model of the swipe table plus the match decision, used to
    /// walk multi-step scenarios without a database.
    struct Board {
        swipes: HashMap<(Uuid, Uuid), SwipeAction>,
        matches: HashSet<(Uuid, Uuid)>,
    }

    impl Board {
        fn new() -> Self {
            Self { swipes: HashMap::new(), matches: HashSet::new() }
        }

        /// Returns (matched, newly created).
        fn swipe(&mut self, swiper: Uuid, target: Uuid, action: SwipeAction) -> (bool, bool) {
            self.swipes.insert((swiper, target), action);
            if !action.is_positive() {
                return (false, false);
            }
            let theirs = self.swipes.get(&(target, swiper)).copied();
            if !is_mutual(action, theirs) {
                return (false, false);
            }
            let created = self.matches.insert(canonical_pair(swiper, target));
            (true, created)
        }
    }

    #[test]
    fn mutual_like_matches_exactly_once() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut board = Board::new();

        assert_eq!(board.swipe(u1, u2, SwipeAction::Like), (false, false));
        assert_eq!(board.swipe(u2, u1, SwipeAction::Like), (true, true));
        // A repeated like finds the match but creates nothing new.
        assert_eq!(board.swipe(u2, u1, SwipeAction::Like), (true, false));
        assert_eq!(board.matches.len(), 1);
    }

    #[test]
    fn pass_then_like_supersedes() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut board = Board::new();

        assert_eq!(board.swipe(u1, u2, SwipeAction::Pass), (false, false));
        assert_eq!(board.swipe(u2, u1, SwipeAction::Like), (false, false));
        // The swiper changes their mind; only the latest action counts.
        assert_eq!(board.swipe(u1, u2, SwipeAction::Like), (true, true));
    }

    #[test]
    fn like_then_pass_never_matches() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut board = Board::new();

        board.swipe(u1, u2, SwipeAction::Like);
        board.swipe(u1, u2, SwipeAction::Pass);
        assert_eq!(board.swipe(u2, u1, SwipeAction::Like), (false, false));
        assert!(board.matches.is_empty());
    }

    #[test]
    fn racing_reciprocal_likes_serialize_to_one_match() {
        // The pair advisory lock reduces any interleaving of two reciprocal
        // likes to one of these two orders; in both, the second swipe sees
        // the first's committed like and exactly one match is created.
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        for order in [[(u1, u2), (u2, u1)], [(u2, u1), (u1, u2)]] {
            let mut board = Board::new();
            let mut created = 0;
            for (swiper, target) in order {
                let (_, is_new) = board.swipe(swiper, target, SwipeAction::Like);
                if is_new {
                    created += 1;
                }
            }
            assert_eq!(created, 1);
            assert_eq!(board.matches.len(), 1);
        }
    }

    #[test]
    fn superlikes_match_like_likes() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut board = Board::new();

        board.swipe(u1, u2, SwipeAction::Superlike);
        assert_eq!(board.swipe(u2, u1, SwipeAction::Superlike), (true, true));
    }
}
