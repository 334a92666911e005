use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::schema::{matches, profiles, swipes};

// --- Swipe action ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    Like,
    Pass,
    Superlike,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
            Self::Superlike => "superlike",
        }
    }

    /// Likes and superlikes count toward a match; a pass never does.
    pub fn is_positive(&self) -> bool {
        !matches!(self, Self::Pass)
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "pass" => Ok(Self::Pass),
            "superlike" => Ok(Self::Superlike),
            other => Err(format!("unknown swipe action '{other}'")),
        }
    }
}

// --- Swipe ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = swipes)]
pub struct Swipe {
    pub id: Uuid,
    pub swiper_id: Uuid,
    pub target_id: Uuid,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub swiper_id: Uuid,
    pub target_id: Uuid,
    pub action: String,
}

// --- Match ---
// Rows store the pair in canonical order (user_a_id < user_b_id) so the
// unique constraint covers both swipe directions.

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
}

/// Match as served to one side: the other participant, resolved against the
/// profile mirror.
#[derive(Debug, Serialize)]
pub struct MatchView {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub partner_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Profile mirror ---
// Fed from user.registered / profile.updated events; gates swipes to known
// users and supplies partner display names.

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub name: Option<String>,
    pub college: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub college: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips() {
        for action in [SwipeAction::Like, SwipeAction::Pass, SwipeAction::Superlike] {
            assert_eq!(action.as_str().parse::<SwipeAction>(), Ok(action));
        }
        assert!("LIKE".parse::<SwipeAction>().is_err());
        assert!("nope".parse::<SwipeAction>().is_err());
    }

    #[test]
    fn only_pass_is_negative() {
        assert!(SwipeAction::Like.is_positive());
        assert!(SwipeAction::Superlike.is_positive());
        assert!(!SwipeAction::Pass.is_positive());
    }
}
