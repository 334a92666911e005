use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;

use veil_shared::types::event::{payloads, routing_keys, Event};

use crate::services::member_service;
use crate::AppState;

/// Keep the local member mirror in sync with the user service. Registration
/// seeds a row; profile updates refresh the display name and college.
pub async fn listen_user_events(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "veil-confession.user-mirror",
        &[
            routing_keys::AUTH_USER_REGISTERED,
            routing_keys::USER_PROFILE_UPDATED,
        ],
    ).await?;

    tracing::info!("listening for user registration and profile events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                let routing_key = delivery.routing_key.as_str().to_string();
                if let Err(e) = handle_delivery(&state, &routing_key, &delivery.data) {
                    tracing::error!(error = %e, routing_key = %routing_key, "failed to apply user event");
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "consumer error");
            }
        }
    }

    Ok(())
}

fn handle_delivery(state: &AppState, routing_key: &str, data: &[u8]) -> anyhow::Result<()> {
    match routing_key {
        routing_keys::AUTH_USER_REGISTERED => {
            let event: Event<payloads::UserRegistered> = serde_json::from_slice(data)?;
            member_service::seed_member(&state.db, event.data.user_id, &event.data.college)?;
            tracing::info!(user_id = %event.data.user_id, "member mirror seeded");
        }
        routing_keys::USER_PROFILE_UPDATED => {
            let event: Event<payloads::ProfileUpdated> = serde_json::from_slice(data)?;
            member_service::upsert_member(
                &state.db,
                event.data.user_id,
                event.data.name.as_deref(),
                &event.data.college,
            )?;
            tracing::debug!(user_id = %event.data.user_id, "member mirror refreshed");
        }
        other => {
            tracing::warn!(routing_key = %other, "unexpected routing key on mirror queue");
        }
    }
    Ok(())
}
