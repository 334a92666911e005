use uuid::Uuid;

use veil_shared::clients::rabbitmq::RabbitMQClient;
use veil_shared::types::event::{payloads, routing_keys, Event};

use crate::models::Confession;
use crate::services::comment_service::CommentOutcome;
use crate::services::reaction_service::ReactOutcome;

/// The created event deliberately carries no author. Downstream consumers
/// only ever see the college-scoped public shape.
pub async fn publish_confession_created(rabbitmq: &RabbitMQClient, confession: &Confession) {
    let event = Event::new(
        "veil-confession",
        routing_keys::CONFESSION_CREATED,
        payloads::ConfessionCreated {
            confession_id: confession.id,
            college: confession.college.clone(),
            category: confession.category.clone(),
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::CONFESSION_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish confession.created event");
    }
}

/// Addressed to the confession author via the envelope user id, which stays
/// inside the broker.
pub async fn publish_confession_reacted(rabbitmq: &RabbitMQClient, outcome: &ReactOutcome) {
    let event = Event::new(
        "veil-confession",
        routing_keys::CONFESSION_REACTED,
        payloads::ConfessionReacted {
            confession_id: outcome.confession_id,
            actor_id: outcome.actor_id,
            kind: outcome.kind.as_str().to_string(),
            reacted: outcome.reacted,
            count: outcome.counts.get(outcome.kind),
        },
    )
    .with_user(outcome.author_id);

    if let Err(e) = rabbitmq.publish(routing_keys::CONFESSION_REACTED, &event).await {
        tracing::error!(error = %e, "failed to publish confession.reacted event");
    }
}

pub async fn publish_comment_added(rabbitmq: &RabbitMQClient, outcome: &CommentOutcome) {
    let mut event = Event::new(
        "veil-confession",
        routing_keys::CONFESSION_COMMENT_ADDED,
        payloads::CommentAdded {
            confession_id: outcome.comment.confession_id,
            comment_id: outcome.comment.id,
            is_reply: outcome.comment.parent_id.is_some(),
            is_anonymous: outcome.comment.is_anonymous,
            author_name: outcome.author_name.clone(),
        },
    );

    // Addressed only when someone else commented; authors commenting on
    // their own confession get no notification.
    if outcome.comment.author_id != outcome.confession_author_id {
        event = event.with_user(outcome.confession_author_id);
    }

    if let Err(e) = rabbitmq.publish(routing_keys::CONFESSION_COMMENT_ADDED, &event).await {
        tracing::error!(error = %e, "failed to publish comment.added event");
    }
}

pub async fn publish_confession_reported(
    rabbitmq: &RabbitMQClient,
    confession_id: Uuid,
    reporter_id: Uuid,
    reason: &str,
) {
    let event = Event::new(
        "veil-confession",
        routing_keys::CONFESSION_REPORTED,
        payloads::ConfessionReported {
            confession_id,
            reporter_id,
            reason: reason.to_string(),
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::CONFESSION_REPORTED, &event).await {
        tracing::error!(error = %e, "failed to publish confession.reported event");
    }
}
