//! Voter-set reaction ledger.
//!
//! Shared by confession reactions (four fixed kinds) and photo likes (a
//! single implicit kind). A reaction is a pure toggle: the same call flips
//! membership in either direction and the caller cannot force an end-state.
//! Counts are derived from set membership, so they can never go negative or
//! drift from the voter-set. Denormalized count columns are treated as a
//! cache and rebuilt from the sets on load.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed reaction kinds on a confession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Heart,
    Laugh,
    Fire,
    Sad,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::Heart,
        ReactionKind::Laugh,
        ReactionKind::Fire,
        ReactionKind::Sad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Heart => "heart",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Fire => "fire",
            ReactionKind::Sad => "sad",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heart" => Ok(ReactionKind::Heart),
            "laugh" => Ok(ReactionKind::Laugh),
            "fire" => Ok(ReactionKind::Fire),
            "sad" => Ok(ReactionKind::Sad),
            _ => Err(format!("unknown reaction kind: {s}")),
        }
    }
}

/// Outcome of a single toggle: the resulting membership and the new count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub reacted: bool,
    pub count: i32,
}

/// A set of actor ids with at-most-once membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterSet(BTreeSet<Uuid>);

impl VoterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the actor's membership; the count returned always equals the
    /// set size after the flip.
    pub fn toggle(&mut self, actor: Uuid) -> Toggle {
        let reacted = if self.0.remove(&actor) {
            false
        } else {
            self.0.insert(actor);
            true
        };
        Toggle {
            reacted,
            count: self.count(),
        }
    }

    pub fn contains(&self, actor: Uuid) -> bool {
        self.0.contains(&actor)
    }

    pub fn count(&self) -> i32 {
        // Voter sets are bounded by the user population, far below i32::MAX.
        self.0.len() as i32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tolerant load from a stored Jsonb array: invalid entries are dropped,
    /// duplicates collapse into single membership.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let voters = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| Uuid::parse_str(s).ok())
                    .collect()
            })
            .unwrap_or_default();
        Self(voters)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.0
                .iter()
                .map(|id| serde_json::Value::String(id.to_string()))
                .collect(),
        )
    }
}

/// Denormalized per-kind counts, serialized alongside the voter-sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub heart: i32,
    pub laugh: i32,
    pub fire: i32,
    pub sad: i32,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionKind) -> i32 {
        match kind {
            ReactionKind::Heart => self.heart,
            ReactionKind::Laugh => self.laugh,
            ReactionKind::Fire => self.fire,
            ReactionKind::Sad => self.sad,
        }
    }
}

/// Per-confession reaction state: one voter-set per kind.
#[derive(Debug, Clone, Default)]
pub struct ReactionLedger {
    sets: BTreeMap<ReactionKind, VoterSet>,
}

impl ReactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the stored `reactions` Jsonb column. Unknown kinds and
    /// malformed entries are dropped; counts are always recomputed from the
    /// sets, never trusted from the stored count column.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut sets = BTreeMap::new();
        if let Some(map) = value.as_object() {
            for (key, voters) in map {
                if let Ok(kind) = key.parse::<ReactionKind>() {
                    sets.insert(kind, VoterSet::from_json(voters));
                }
            }
        }
        Self { sets }
    }

    pub fn toggle(&mut self, kind: ReactionKind, actor: Uuid) -> Toggle {
        self.sets.entry(kind).or_default().toggle(actor)
    }

    pub fn contains(&self, kind: ReactionKind, actor: Uuid) -> bool {
        self.sets.get(&kind).is_some_and(|set| set.contains(actor))
    }

    pub fn count(&self, kind: ReactionKind) -> i32 {
        self.sets.get(&kind).map_or(0, VoterSet::count)
    }

    pub fn counts(&self) -> ReactionCounts {
        ReactionCounts {
            heart: self.count(ReactionKind::Heart),
            laugh: self.count(ReactionKind::Laugh),
            fire: self.count(ReactionKind::Fire),
            sad: self.count(ReactionKind::Sad),
        }
    }

    /// Serialize the voter-sets for the `reactions` Jsonb column. Every kind
    /// is present so readers never see a partial map.
    pub fn voters_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for kind in ReactionKind::ALL {
            let set = self.sets.get(&kind).cloned().unwrap_or_default();
            map.insert(kind.as_str().to_string(), set.to_json());
        }
        serde_json::Value::Object(map)
    }

    /// Serialize the derived counts for the `reaction_counts` Jsonb column.
    pub fn counts_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for kind in ReactionKind::ALL {
            map.insert(kind.as_str().to_string(), self.count(kind).into());
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut set = VoterSet::new();
        let u1 = uid(1);

        let on = set.toggle(u1);
        assert!(on.reacted);
        assert_eq!(on.count, 1);
        assert!(set.contains(u1));

        let off = set.toggle(u1);
        assert!(!off.reacted);
        assert_eq!(off.count, 0);
        assert!(!set.contains(u1));
    }

    #[test]
    fn double_toggle_is_a_noop() {
        let mut set = VoterSet::new();
        set.toggle(uid(7));
        set.toggle(uid(8));
        let before = set.clone();

        set.toggle(uid(9));
        set.toggle(uid(9));
        assert_eq!(set, before);
    }

    #[test]
    fn count_tracks_membership_through_arbitrary_sequences() {
        let mut set = VoterSet::new();
        // Deterministic pseudo-random toggle sequence over 8 actors.
        let mut state: u64 = 0x9E37_79B9;
        for _ in 0..500 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let actor = uid(u128::from(state % 8));
            let outcome = set.toggle(actor);
            assert_eq!(outcome.count, set.count());
            assert_eq!(outcome.reacted, set.contains(actor));
            assert!(outcome.count >= 0);
        }
    }

    #[test]
    fn heart_scenario_two_users() {
        // C starts at heart=0. U1 reacts -> 1, U2 reacts -> 2, U1 again -> 1.
        let mut ledger = ReactionLedger::new();
        let (u1, u2) = (uid(1), uid(2));

        let first = ledger.toggle(ReactionKind::Heart, u1);
        assert!(first.reacted);
        assert_eq!(first.count, 1);

        let second = ledger.toggle(ReactionKind::Heart, u2);
        assert!(second.reacted);
        assert_eq!(second.count, 2);

        let third = ledger.toggle(ReactionKind::Heart, u1);
        assert!(!third.reacted);
        assert_eq!(third.count, 1);
        assert!(ledger.contains(ReactionKind::Heart, u2));
    }

    #[test]
    fn kinds_are_independent() {
        let mut ledger = ReactionLedger::new();
        let u1 = uid(1);

        ledger.toggle(ReactionKind::Heart, u1);
        ledger.toggle(ReactionKind::Fire, u1);
        ledger.toggle(ReactionKind::Heart, u1);

        let counts = ledger.counts();
        assert_eq!(counts.heart, 0);
        assert_eq!(counts.fire, 1);
        assert_eq!(counts.laugh, 0);
        assert_eq!(counts.sad, 0);
    }

    #[test]
    fn counts_always_equal_set_sizes() {
        let mut ledger = ReactionLedger::new();
        for i in 0..40u128 {
            let kind = ReactionKind::ALL[(i % 4) as usize];
            ledger.toggle(kind, uid(i % 10));
        }
        for kind in ReactionKind::ALL {
            let stored = ledger.counts().get(kind);
            let recomputed = ledger.count(kind);
            assert_eq!(stored, recomputed);
            assert!(stored >= 0);
        }
    }

    #[test]
    fn from_json_ignores_drifted_counts_and_junk() {
        // Stored counts are irrelevant; only the voter arrays matter.
        // Unknown kinds, bad uuids, and duplicate voters are dropped.
        let u1 = uid(1);
        let stored = json!({
            "heart": [u1.to_string(), u1.to_string(), "not-a-uuid"],
            "wink": ["00000000-0000-0000-0000-000000000002"],
            "sad": [],
        });
        let ledger = ReactionLedger::from_json(&stored);

        assert_eq!(ledger.count(ReactionKind::Heart), 1);
        assert_eq!(ledger.count(ReactionKind::Sad), 0);
        assert_eq!(ledger.count(ReactionKind::Laugh), 0);
        assert!(ledger.contains(ReactionKind::Heart, u1));
    }

    #[test]
    fn json_round_trip_preserves_membership() {
        let mut ledger = ReactionLedger::new();
        ledger.toggle(ReactionKind::Laugh, uid(3));
        ledger.toggle(ReactionKind::Laugh, uid(4));
        ledger.toggle(ReactionKind::Sad, uid(3));

        let reloaded = ReactionLedger::from_json(&ledger.voters_json());
        assert_eq!(reloaded.counts(), ledger.counts());
        assert!(reloaded.contains(ReactionKind::Laugh, uid(4)));
    }

    #[test]
    fn voters_json_is_complete_per_kind() {
        let ledger = ReactionLedger::new();
        let voters = ledger.voters_json();
        for kind in ReactionKind::ALL {
            assert!(voters.get(kind.as_str()).is_some());
        }
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("heart".parse::<ReactionKind>().unwrap(), ReactionKind::Heart);
        assert_eq!("sad".parse::<ReactionKind>().unwrap(), ReactionKind::Sad);
        assert!("like".parse::<ReactionKind>().is_err());
        assert!("HEART".parse::<ReactionKind>().is_err());
        assert!("".parse::<ReactionKind>().is_err());
    }
}
