use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;

use veil_shared::types::event::{payloads, routing_keys, Event};

use crate::services::notification_service;
use crate::AppState;

/// Listen for match.created events and notify both participants.
pub async fn listen_match_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "veil-notification.match.created",
        &[routing_keys::MATCHING_MATCH_CREATED],
    ).await?;

    tracing::info!("listening for match events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::MatchCreated>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(match_id = %data.match_id, "received match.created event");

                        let sides = [
                            (data.user_a_id, data.user_b_name.as_deref()),
                            (data.user_b_id, data.user_a_name.as_deref()),
                        ];
                        for (recipient, partner_name) in sides {
                            let body = match partner_name {
                                Some(name) => format!("You matched with {name}"),
                                None => "You have a new match".to_string(),
                            };
                            if let Err(e) = notification_service::create_notification(
                                &state.db,
                                recipient,
                                "match_created",
                                "It's a match!",
                                &body,
                                Some(serde_json::json!({ "match_id": data.match_id })),
                            ) {
                                tracing::error!(error = %e, "failed to create match notification");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize match.created event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "match consumer error");
            }
        }
    }

    Ok(())
}

/// Listen for comment.added and confession.reacted events. Both are
/// addressed to the confession author through the envelope user_id; the
/// author never appears in the payload.
pub async fn listen_confession_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "veil-notification.confession",
        &[
            routing_keys::CONFESSION_COMMENT_ADDED,
            routing_keys::CONFESSION_REACTED,
        ],
    ).await?;

    tracing::info!("listening for confession events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                let routing_key = delivery.routing_key.as_str().to_string();

                if routing_key == routing_keys::CONFESSION_COMMENT_ADDED {
                    match serde_json::from_slice::<Event<payloads::CommentAdded>>(&delivery.data) {
                        Ok(event) => {
                            if let Some(recipient) = event.user_id {
                                let data = &event.data;
                                let who = data
                                    .author_name
                                    .as_deref()
                                    .filter(|_| !data.is_anonymous)
                                    .unwrap_or("Someone");
                                let what = if data.is_reply {
                                    "replied on your confession"
                                } else {
                                    "commented on your confession"
                                };
                                if let Err(e) = notification_service::create_notification(
                                    &state.db,
                                    recipient,
                                    "comment_added",
                                    "New comment",
                                    &format!("{who} {what}"),
                                    Some(serde_json::json!({
                                        "confession_id": data.confession_id,
                                        "comment_id": data.comment_id,
                                    })),
                                ) {
                                    tracing::error!(error = %e, "failed to create comment notification");
                                }
                            } else {
                                // Unaddressed events are self-comments.
                                tracing::debug!("comment.added event not addressed, skipping");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize comment.added event");
                        }
                    }
                } else if routing_key == routing_keys::CONFESSION_REACTED {
                    match serde_json::from_slice::<Event<payloads::ConfessionReacted>>(&delivery.data) {
                        Ok(event) => {
                            let data = &event.data;
                            // Only first-time reactions notify; removing one
                            // or reacting to your own confession does not.
                            let self_react = event.user_id == Some(data.actor_id);
                            if data.reacted && !self_react {
                                if let Some(recipient) = event.user_id {
                                    if let Err(e) = notification_service::create_notification(
                                        &state.db,
                                        recipient,
                                        "confession_reacted",
                                        "New reaction",
                                        &format!("Someone reacted {} to your confession", data.kind),
                                        Some(serde_json::json!({
                                            "confession_id": data.confession_id,
                                            "kind": data.kind,
                                        })),
                                    ) {
                                        tracing::error!(error = %e, "failed to create reaction notification");
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to deserialize confession.reacted event");
                        }
                    }
                }

                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "confession consumer error");
            }
        }
    }

    Ok(())
}

/// Listen for photo.liked events and notify the photo owner.
pub async fn listen_photo_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "veil-notification.photo.liked",
        &[routing_keys::USER_PHOTO_LIKED],
    ).await?;

    tracing::info!("listening for photo like events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::PhotoLiked>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        // Un-likes and likes on your own photo stay silent.
                        if data.is_liked && data.actor_id != data.owner_id {
                            if let Err(e) = notification_service::create_notification(
                                &state.db,
                                data.owner_id,
                                "photo_liked",
                                "Photo liked",
                                "Someone liked your photo",
                                Some(serde_json::json!({
                                    "photo_id": data.photo_id,
                                    "like_count": data.like_count,
                                })),
                            ) {
                                tracing::error!(error = %e, "failed to create photo like notification");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize photo.liked event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "photo consumer error");
            }
        }
    }

    Ok(())
}
