use veil_shared::clients::db::DbPool;
use veil_shared::clients::rabbitmq::RabbitMQClient;
use veil_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Match;
use crate::services::profile_service;

/// Publish a freshly created match. Names from the profile mirror ride along
/// so the notification service can render both sides without a lookup.
pub async fn publish_match_created(rabbitmq: &RabbitMQClient, db: &DbPool, matched: &Match) {
    let user_a_name = profile_service::get_profile(db, matched.user_a_id)
        .ok()
        .and_then(|p| p.name);
    let user_b_name = profile_service::get_profile(db, matched.user_b_id)
        .ok()
        .and_then(|p| p.name);

    let event = Event::new(
        "veil-matching",
        routing_keys::MATCHING_MATCH_CREATED,
        payloads::MatchCreated {
            match_id: matched.id,
            user_a_id: matched.user_a_id,
            user_b_id: matched.user_b_id,
            user_a_name,
            user_b_name,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCHING_MATCH_CREATED, &event).await {
        tracing::error!(error = %e, match_id = %matched.id, "failed to publish match.created event");
    }
}
