// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use futures::StreamExt;
use poem::web::sse::{Event, SSE};
use poem::web::Path;
use poem::handler;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::modules::common::signal::SIGNAL_MANAGER;
use crate::modules::store::{inbox_key, Store};

const KEEP_ALIVE: Duration = Duration::from_secs(20);

/// Long-lived SSE response for one inbox. Each published message id becomes
/// a `new_message` event; the id is a hint, and clients reconcile by
/// re-listing the inbox. Closes on client disconnect and process shutdown.
#[handler]
pub async fn stream_inbox(Path((domain, local)): Path<(String, String)>) -> SSE {
    let domain = domain.trim().to_lowercase();
    let local = local.trim().to_lowercase();
    let channel = inbox_key(&domain, &local);

    let (tx, rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut pubsub = match Store::global().pubsub().await {
            Ok(pubsub) => pubsub,
            Err(e) => {
                warn!("Subscription to {} failed: {:?}", channel, e);
                return;
            }
        };
        if let Err(e) = pubsub.subscribe(&channel).await {
            warn!("Subscription to {} failed: {}", channel, e);
            return;
        }

        let mut shutdown = SIGNAL_MANAGER.subscribe();
        let mut notifications = pubsub.on_message();
        loop {
            tokio::select! {
                notification = notifications.next() => {
                    let Some(notification) = notification else {
                        break;
                    };
                    let id: String = notification.get_payload().unwrap_or_default();
                    // A closed receiver means the client went away.
                    if tx.send(id).await.is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    debug!("Closing stream for {} on shutdown", channel);
                    break;
                }
            }
        }
    });

    let events = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|id| (Event::message(id).event_type("new_message"), rx))
    });

    SSE::new(events).keep_alive(KEEP_ALIVE)
}
