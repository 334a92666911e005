use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;

use veil_shared::types::event::{payloads, routing_keys, Event};

use crate::services::profile_service;
use crate::AppState;

/// Listen for auth.user.registered events to create user rows.
pub async fn listen_user_registered(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut consumer = state.rabbitmq.subscribe(
        "veil-user.auth.user.registered",
        &[routing_keys::AUTH_USER_REGISTERED],
    ).await?;

    tracing::info!("listening for auth.user.registered events");

    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::UserRegistered>>(&delivery.data) {
                    Ok(event) => {
                        let data = &event.data;
                        tracing::info!(
                            user_id = %data.user_id,
                            college = %data.college,
                            "received user.registered event"
                        );

                        if let Err(e) = profile_service::create_user(
                            &state.db,
                            data.user_id,
                            &data.email,
                            &data.college,
                        ) {
                            tracing::error!(
                                error = %e,
                                user_id = %data.user_id,
                                "failed to create user from registration event"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize user.registered event");
                    }
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
