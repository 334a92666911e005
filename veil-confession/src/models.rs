use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veil_shared::reaction::ReactionCounts;

use crate::schema::{comments, confessions, members};

// --- Category ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfessionCategory {
    Love,
    Breakup,
    Secret,
    Funny,
    Crush,
}

impl ConfessionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfessionCategory::Love => "love",
            ConfessionCategory::Breakup => "breakup",
            ConfessionCategory::Secret => "secret",
            ConfessionCategory::Funny => "funny",
            ConfessionCategory::Crush => "crush",
        }
    }
}

impl std::fmt::Display for ConfessionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfessionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "love" => Ok(ConfessionCategory::Love),
            "breakup" => Ok(ConfessionCategory::Breakup),
            "secret" => Ok(ConfessionCategory::Secret),
            "funny" => Ok(ConfessionCategory::Funny),
            "crush" => Ok(ConfessionCategory::Crush),
            _ => Err(format!("unknown category: {s}")),
        }
    }
}

// --- Confession ---
//
// Deliberately not Serialize: the row carries `author_id` and the raw voter
// lists, which must never reach a read path. Responses go through
// `ConfessionView`.

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = confessions)]
pub struct Confession {
    pub id: Uuid,
    pub author_id: Uuid,
    pub college: String,
    pub content: String,
    pub category: String,
    pub reactions: serde_json::Value,
    pub reaction_counts: serde_json::Value,
    pub comment_count: i32,
    pub is_reported: bool,
    pub reports: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = confessions)]
pub struct NewConfession {
    pub author_id: Uuid,
    pub college: String,
    pub content: String,
    pub category: String,
    pub reactions: serde_json::Value,
    pub reaction_counts: serde_json::Value,
}

/// The anonymized read shape. Authorship is stored but never serialized;
/// anonymity is enforced here at the data boundary, not in the UI.
#[derive(Debug, Serialize)]
pub struct ConfessionView {
    pub id: Uuid,
    pub college: String,
    pub category: String,
    pub content: String,
    pub reaction_counts: ReactionCounts,
    /// Kinds the requesting user currently has toggled on.
    pub viewer_reactions: Vec<&'static str>,
    pub comment_count: i32,
    pub created_at: DateTime<Utc>,
}

// --- Comment ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: Uuid,
    pub confession_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub confession_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
}

/// Comment as served: the author id never appears; a display name is shown
/// only when the commenter chose not to be anonymous.
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentView>,
}

// --- Member mirror ---
// Kept in sync from user.registered / profile.updated events; supplies the
// author's college at creation time and display names for non-anonymous
// comments.

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = members)]
pub struct Member {
    pub id: Uuid,
    pub name: Option<String>,
    pub college: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = members)]
pub struct NewMember {
    pub id: Uuid,
    pub name: Option<String>,
    pub college: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing() {
        assert_eq!("crush".parse::<ConfessionCategory>().unwrap(), ConfessionCategory::Crush);
        assert_eq!("love".parse::<ConfessionCategory>().unwrap(), ConfessionCategory::Love);
        assert!("rant".parse::<ConfessionCategory>().is_err());
        assert!("LOVE".parse::<ConfessionCategory>().is_err());
    }

    #[test]
    fn confession_view_has_no_author_field() {
        // The serialized feed item must not leak authorship in any key.
        let view = ConfessionView {
            id: Uuid::from_u128(1),
            college: "IIT Delhi".into(),
            category: "secret".into(),
            content: "…".into(),
            reaction_counts: ReactionCounts::default(),
            viewer_reactions: vec![],
            comment_count: 0,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&view).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|k| !k.contains("author")));
    }
}
