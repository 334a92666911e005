use uuid::Uuid;

use veil_shared::clients::rabbitmq::RabbitMQClient;
use veil_shared::types::event::{payloads, routing_keys, Event};

use crate::services::photo_service::LikeOutcome;

pub async fn publish_profile_updated(
    rabbitmq: &RabbitMQClient,
    user_id: Uuid,
    name: Option<&str>,
    college: &str,
) {
    let event = Event::new(
        "veil-user",
        routing_keys::USER_PROFILE_UPDATED,
        payloads::ProfileUpdated {
            user_id,
            name: name.map(str::to_string),
            college: college.to_string(),
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq.publish(routing_keys::USER_PROFILE_UPDATED, &event).await {
        tracing::error!(error = %e, "failed to publish profile.updated event");
    }
}

pub async fn publish_photo_liked(rabbitmq: &RabbitMQClient, outcome: &LikeOutcome, actor_id: Uuid) {
    let event = Event::new(
        "veil-user",
        routing_keys::USER_PHOTO_LIKED,
        payloads::PhotoLiked {
            photo_id: outcome.photo_id,
            owner_id: outcome.owner_id,
            actor_id,
            is_liked: outcome.is_liked,
            like_count: outcome.like_count,
        },
    )
    .with_user(actor_id);

    if let Err(e) = rabbitmq.publish(routing_keys::USER_PHOTO_LIKED, &event).await {
        tracing::error!(error = %e, "failed to publish photo.liked event");
    }
}
