use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `veil.{domain}.{entity}.{action}`
/// Example: `veil.matching.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Auth events (published by the external auth provider)
    pub const AUTH_USER_REGISTERED: &str = "veil.auth.user.registered";

    // User events
    pub const USER_PROFILE_UPDATED: &str = "veil.user.profile.updated";
    pub const USER_PHOTO_LIKED: &str = "veil.user.photo.liked";

    // Confession events
    pub const CONFESSION_CREATED: &str = "veil.confession.post.created";
    pub const CONFESSION_REACTED: &str = "veil.confession.post.reacted";
    pub const CONFESSION_COMMENT_ADDED: &str = "veil.confession.comment.added";
    pub const CONFESSION_REPORTED: &str = "veil.confession.post.reported";

    // Matching events
    pub const MATCHING_MATCH_CREATED: &str = "veil.matching.match.created";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserRegistered {
        pub user_id: Uuid,
        pub email: String,
        pub college: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileUpdated {
        pub user_id: Uuid,
        pub name: Option<String>,
        pub college: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PhotoLiked {
        pub photo_id: Uuid,
        pub owner_id: Uuid,
        pub actor_id: Uuid,
        pub is_liked: bool,
        pub like_count: i32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ConfessionCreated {
        pub confession_id: Uuid,
        pub college: String,
        pub category: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ConfessionReacted {
        pub confession_id: Uuid,
        pub actor_id: Uuid,
        pub kind: String,
        pub reacted: bool,
        pub count: i32,
    }

    /// Note: the confession author is intentionally absent here. The
    /// notification for the author is addressed via the envelope `user_id`,
    /// which never leaves the broker.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CommentAdded {
        pub confession_id: Uuid,
        pub comment_id: Uuid,
        pub is_reply: bool,
        pub is_anonymous: bool,
        pub author_name: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ConfessionReported {
        pub confession_id: Uuid,
        pub reporter_id: Uuid,
        pub reason: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
        pub user_a_name: Option<String>,
        pub user_b_name: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_through_json() {
        let event = Event::new(
            "veil-matching",
            routing_keys::MATCHING_MATCH_CREATED,
            payloads::MatchCreated {
                match_id: Uuid::from_u128(1),
                user_a_id: Uuid::from_u128(2),
                user_b_id: Uuid::from_u128(3),
                user_a_name: Some("sam".into()),
                user_b_name: None,
            },
        )
        .with_user(Uuid::from_u128(2));

        let bytes = serde_json::to_vec(&event).unwrap();
        let parsed: Event<payloads::MatchCreated> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.event_type, routing_keys::MATCHING_MATCH_CREATED);
        assert_eq!(parsed.data.match_id, Uuid::from_u128(1));
        assert_eq!(parsed.user_id, Some(Uuid::from_u128(2)));
    }
}
