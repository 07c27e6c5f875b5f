// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use async_imap::types::Fetch;
use async_imap::Session;
use chrono::Utc;
use futures::TryStreamExt;
use mail_parser::MessageParser;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::modules::common::signal::SIGNAL_MANAGER;
use crate::modules::context::CattyMailTask;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CattyMailResult;
use crate::modules::imap::client::Client;
use crate::modules::imap::session::SessionStream;
use crate::modules::message::Message;
use crate::modules::scheduler::periodic::PeriodicTask;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::store::Store;
use crate::modules::utils::message_id;
use crate::raise_error;

mod extract;
mod recipient;

/// INBOX plus the spam folder spellings seen on common upstream hosts.
/// Folders that do not exist are skipped at SELECT time.
const FOLDERS: [&str; 3] = ["INBOX", "INBOX.spam", "INBOX.Junk"];

const FETCH_QUERY: &str = "(UID ENVELOPE INTERNALDATE BODY.PEEK[])";

type ImapSession = Session<Box<dyn SessionStream>>;

/// Upstream credentials for one polling cycle: the static settings with any
/// store-resident overrides applied on top.
struct Endpoint {
    host: String,
    port: u16,
    user: String,
    pass: String,
}

async fn resolve_endpoint(store: &Store) -> Endpoint {
    let mut endpoint = Endpoint {
        host: SETTINGS.cattymail_imap_host.clone(),
        port: SETTINGS.cattymail_imap_port,
        user: SETTINGS.cattymail_imap_user.clone(),
        pass: SETTINGS.cattymail_imap_pass.clone(),
    };
    match store.imap_overrides().await {
        Ok(Some(overrides)) => {
            endpoint.host = overrides.host;
            endpoint.port = overrides.port;
            endpoint.user = overrides.user;
            endpoint.pass = overrides.pass;
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to read IMAP overrides, using static settings: {:?}", e),
    }
    endpoint
}

fn shutdown_requested(rx: &mut broadcast::Receiver<()>) -> bool {
    !matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty))
}

pub struct IngestTask;

impl CattyMailTask for IngestTask {
    fn start() {
        let periodic_task = PeriodicTask::new("imap-ingestor");
        let task = move || run_cycle();
        periodic_task.start(
            task,
            Duration::from_secs(SETTINGS.cattymail_poll_seconds),
            false,
            true,
        );
    }
}

/// One polling cycle: refresh dynamic inputs, open a session, drain every
/// folder above its high-water mark, log out. Any connection-level failure
/// aborts the cycle; the next tick retries.
async fn run_cycle() -> CattyMailResult<()> {
    let store = Store::global();
    let endpoint = resolve_endpoint(store).await;
    if endpoint.host.is_empty() {
        debug!("IMAP host not configured; skipping poll cycle");
        return Ok(());
    }
    let allowed_domains = store.merged_domains().await;

    let client = Client::connection(
        &endpoint.host,
        endpoint.port,
        SETTINGS.cattymail_imap_tls_verify,
    )
    .await?;
    let mut session = client.login(&endpoint.user, &endpoint.pass).await?;

    let mut shutdown = SIGNAL_MANAGER.subscribe();
    for folder in FOLDERS {
        if shutdown_requested(&mut shutdown) {
            break;
        }
        if let Err(e) = process_folder(
            &mut session,
            folder,
            &endpoint.user,
            &allowed_domains,
            &mut shutdown,
        )
        .await
        {
            warn!("Error processing folder {}: {:?}", folder, e);
        }
    }

    let _ = session.logout().await;
    Ok(())
}

async fn process_folder(
    session: &mut ImapSession,
    folder: &str,
    user: &str,
    allowed_domains: &[String],
    shutdown: &mut broadcast::Receiver<()>,
) -> CattyMailResult<()> {
    let mailbox = match session.select(folder).await {
        Ok(mailbox) => mailbox,
        Err(e) => {
            // Folder may simply not exist on this host.
            debug!("Folder {} not found or failed to select: {:?}", folder, e);
            return Ok(());
        }
    };

    let store = Store::global();
    let last_uid = store.folder_last_uid(user, folder).await?;
    let uid_next = mailbox.uid_next.unwrap_or(0);
    debug!(
        "Folder {}: last_uid={}, uid_next={}, exists={}",
        folder, last_uid, uid_next, mailbox.exists
    );
    if uid_next > 0 && last_uid + 1 >= uid_next {
        return Ok(());
    }

    // Range mode: everything above the high-water mark. A range past the
    // end of the mailbox makes the server echo its last message, so UIDs at
    // or below the mark are filtered out again below.
    let range = format!("{}:*", last_uid + 1);
    let mut fetches: Vec<Fetch> = {
        let stream = session
            .uid_fetch(&range, FETCH_QUERY)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        stream
            .try_collect()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?
    };
    fetches.sort_by_key(|fetch| fetch.uid.unwrap_or(0));

    let mut max_seen = last_uid;
    for fetch in &fetches {
        if shutdown_requested(shutdown) {
            break;
        }
        let Some(uid) = fetch.uid else {
            continue;
        };
        if uid <= last_uid {
            continue;
        }
        if let Err(e) = ingest_message(store, fetch, uid, folder, allowed_domains).await {
            warn!("Failed to ingest message {} ({}): {:?}", uid, folder, e);
        }
        // The mark advances over skipped and failed messages alike; dedup
        // markers and the next cycle cover anything transient.
        max_seen = max_seen.max(uid);
    }

    if max_seen > last_uid {
        store.set_folder_last_uid(user, folder, max_seen).await?;
    }

    Ok(())
}

async fn ingest_message(
    store: &Store,
    fetch: &Fetch,
    uid: u32,
    folder: &str,
    allowed_domains: &[String],
) -> CattyMailResult<()> {
    if store.is_uid_processed(folder, uid).await? {
        return Ok(());
    }

    let Some(raw) = fetch.body() else {
        return Err(raise_error!(
            "Server did not return a message body".into(),
            ErrorCode::ImapCommandFailed
        ));
    };
    if raw.len() > SETTINGS.cattymail_max_email_bytes {
        debug!("Message {} too large: {} bytes", uid, raw.len());
        return store.mark_uid_processed(folder, uid).await;
    }

    let parsed = MessageParser::new().parse(raw).ok_or_else(|| {
        raise_error!(
            "Message body could not be parsed".into(),
            ErrorCode::EmailParseFailed
        )
    })?;

    let Some(original_to) = recipient::identify(&parsed, allowed_domains) else {
        debug!(
            "Message {} skipped: no recipient under an allowed domain",
            uid
        );
        return Ok(());
    };
    let Some((local, domain)) = original_to.split_once('@') else {
        return Ok(());
    };

    let date = extract::date(&parsed)
        .or_else(|| {
            fetch
                .internal_date()
                .map(|internal| internal.with_timezone(&Utc))
        })
        .unwrap_or_else(Utc::now);
    let (text, html) = extract::bodies(&parsed);

    let message = Message {
        id: message_id(),
        domain: domain.to_string(),
        local: local.to_string(),
        original_to: original_to.clone(),
        from: extract::sender(&parsed),
        subject: extract::subject(&parsed),
        date,
        text,
        html,
        folder: folder.to_string(),
        imap_uid: uid,
    };

    store.save_message(&message).await?;
    info!(
        "Ingested message {} (uid {} in {}) for {}",
        message.id, uid, folder, original_to
    );
    Ok(())
}
