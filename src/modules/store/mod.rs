// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use redis::{
    aio::ConnectionManager, AsyncCommands, ExistenceCheck, SetExpiry, SetOptions,
};
use tracing::{debug, info};

use crate::modules::error::code::ErrorCode;
use crate::modules::error::{CattyMailError, CattyMailResult};
use crate::modules::message::Message;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::context::Initialize;
use crate::raise_error;

pub mod config;
pub mod stats;

static STORE: OnceLock<Store> = OnceLock::new();

const RATE_LIMIT_WINDOW_SECS: i64 = 60;

/// The Redis-backed state store shared by the API server and the ingestor.
/// Every key that a user can observe carries the retention TTL; only the
/// folder high-water marks and dynamic configuration persist.
pub struct Store {
    client: redis::Client,
    conn: ConnectionManager,
    ttl: u64,
}

pub(crate) fn store_err(e: redis::RedisError) -> CattyMailError {
    raise_error!(format!("{}", e), ErrorCode::StoreUnavailable)
}

pub fn addr_key(domain: &str, local: &str) -> String {
    format!("addr:{}:{}", domain, local)
}

pub fn msg_key(id: &str) -> String {
    format!("msg:{}", id)
}

pub fn inbox_key(domain: &str, local: &str) -> String {
    format!("inbox:{}:{}", domain, local)
}

pub fn uid_key(folder: &str, uid: u32) -> String {
    format!("imap:uid:{}:{}", folder, uid)
}

pub fn last_uid_key(user: &str, folder: &str) -> String {
    format!("imap:last_uid:{}:{}", user, folder)
}

pub fn rate_key(action: &str, client: &str) -> String {
    format!("ratelimit:{}:{}", action, client)
}

impl Initialize for Store {
    async fn initialize() -> CattyMailResult<()> {
        let client = redis::Client::open(SETTINGS.cattymail_redis_url.as_str())
            .map_err(store_err)?;
        let mut conn = ConnectionManager::new(client.clone())
            .await
            .map_err(store_err)?;
        // Boot-time reachability check; a dead store here is fatal.
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_err)?;
        info!("Connected to the state store");
        let store = Store {
            client,
            conn,
            ttl: SETTINGS.cattymail_ttl_seconds,
        };
        STORE
            .set(store)
            .map_err(|_| raise_error!("store already initialized".into(), ErrorCode::InternalError))
    }
}

impl Store {
    pub fn global() -> &'static Store {
        STORE.get().expect("store accessed before initialization")
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// ConnectionManager multiplexes; cloning hands out a cheap handle.
    pub(crate) fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Claim `(domain, local)` if nobody holds it. Set-if-absent with the
    /// retention TTL; returns false when the reservation already exists.
    pub async fn reserve_address(&self, domain: &str, local: &str) -> CattyMailResult<bool> {
        let mut conn = self.conn();
        let opts = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(SetExpiry::EX(self.ttl));
        let reply: Option<String> = conn
            .set_options(addr_key(domain, local), "1", opts)
            .await
            .map_err(store_err)?;
        Ok(reply.is_some())
    }

    /// Claim or refresh `(domain, local)` unconditionally, resetting the
    /// retention TTL.
    pub async fn ensure_address(&self, domain: &str, local: &str) -> CattyMailResult<()> {
        let mut conn = self.conn();
        conn.set_ex::<_, _, ()>(addr_key(domain, local), "1", self.ttl)
            .await
            .map_err(store_err)
    }

    /// Persist a message: record, inbox index entry, and dedup marker go in
    /// one transaction, then subscribers are notified. The notification is
    /// best-effort; listing reconciles anything a subscriber misses.
    pub async fn save_message(&self, msg: &Message) -> CattyMailResult<()> {
        let payload = serde_json::to_string(msg)
            .map_err(|e| raise_error!(format!("{}", e), ErrorCode::InternalError))?;
        let inbox = inbox_key(&msg.domain, &msg.local);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .set_ex(msg_key(&msg.id), payload, self.ttl)
            .ignore()
            .zadd(&inbox, &msg.id, msg.score())
            .ignore()
            .expire(&inbox, self.ttl as i64)
            .ignore();
        if msg.imap_uid > 0 && !msg.folder.is_empty() {
            pipe.set_ex(uid_key(&msg.folder, msg.imap_uid), "1", self.ttl)
                .ignore();
        }

        let mut conn = self.conn();
        pipe.query_async::<()>(&mut conn).await.map_err(store_err)?;

        if let Err(e) = conn.publish::<_, _, ()>(&inbox, &msg.id).await {
            debug!("Notification publish failed for {}: {}", inbox, e);
        }
        Ok(())
    }

    /// Newest-first listing. `before > 0` is an exclusive upper bound on the
    /// date score in epoch seconds. Ids whose record has already expired are
    /// dropped silently.
    pub async fn get_inbox(
        &self,
        domain: &str,
        local: &str,
        limit: usize,
        before: i64,
    ) -> CattyMailResult<Vec<Message>> {
        let mut conn = self.conn();
        let max = if before > 0 {
            format!("({}", before)
        } else {
            "+inf".to_string()
        };
        let ids: Vec<String> = conn
            .zrevrangebyscore_limit(inbox_key(domain, local), max, "-inf", 0, limit as isize)
            .await
            .map_err(store_err)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| msg_key(id)).collect();
        let values: Vec<Option<String>> = conn.mget(&keys).await.map_err(store_err)?;
        Ok(values
            .into_iter()
            .flatten()
            .filter_map(|raw| serde_json::from_str::<Message>(&raw).ok())
            .collect())
    }

    pub async fn get_message(&self, id: &str) -> CattyMailResult<Option<Message>> {
        let mut conn = self.conn();
        let raw: Option<String> = conn.get(msg_key(id)).await.map_err(store_err)?;
        match raw {
            Some(raw) => {
                let msg = serde_json::from_str(&raw)
                    .map_err(|e| raise_error!(format!("{}", e), ErrorCode::InternalError))?;
                Ok(Some(msg))
            }
            None => Ok(None),
        }
    }

    /// Remove a record and its inbox index member together. Returns false
    /// when the record no longer exists.
    pub async fn delete_message(&self, id: &str) -> CattyMailResult<bool> {
        let Some(msg) = self.get_message(id).await? else {
            return Ok(false);
        };
        let mut conn = self.conn();
        redis::pipe()
            .atomic()
            .del(msg_key(id))
            .ignore()
            .zrem(inbox_key(&msg.domain, &msg.local), id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(true)
    }

    /// "Already ingested" marker for `(folder, uid)`; only meaningful inside
    /// the retention window.
    pub async fn is_uid_processed(&self, folder: &str, uid: u32) -> CattyMailResult<bool> {
        let mut conn = self.conn();
        conn.exists(uid_key(folder, uid)).await.map_err(store_err)
    }

    /// Write the dedup marker without a record, for messages that were
    /// examined and deliberately not stored.
    pub async fn mark_uid_processed(&self, folder: &str, uid: u32) -> CattyMailResult<()> {
        let mut conn = self.conn();
        conn.set_ex::<_, _, ()>(uid_key(folder, uid), "1", self.ttl)
            .await
            .map_err(store_err)
    }

    /// Per-folder high-water mark, scoped by the mailbox user so a stale
    /// mark from a previous upstream mailbox cannot blackhole a new one.
    pub async fn folder_last_uid(&self, user: &str, folder: &str) -> CattyMailResult<u32> {
        let mut conn = self.conn();
        let uid: Option<u32> = conn
            .get(last_uid_key(user, folder))
            .await
            .map_err(store_err)?;
        Ok(uid.unwrap_or(0))
    }

    pub async fn set_folder_last_uid(
        &self,
        user: &str,
        folder: &str,
        uid: u32,
    ) -> CattyMailResult<()> {
        let mut conn = self.conn();
        conn.set::<_, _, ()>(last_uid_key(user, folder), uid)
            .await
            .map_err(store_err)
    }

    /// Fixed-window counter: INCR + EXPIRE in one transaction, allowed while
    /// the post-increment count stays within the limit.
    pub async fn rate_limit(
        &self,
        action: &str,
        client: &str,
        limit: u32,
    ) -> CattyMailResult<bool> {
        let mut conn = self.conn();
        let key = rate_key(action, client);
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .expire(&key, RATE_LIMIT_WINDOW_SECS)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(count <= limit as u64)
    }

    /// A dedicated pub/sub connection; the multiplexed manager cannot carry
    /// subscriptions.
    pub async fn pubsub(&self) -> CattyMailResult<redis::aio::PubSub> {
        self.client.get_async_pubsub().await.map_err(store_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes_match_the_store_layout() {
        assert_eq!(addr_key("catty.my.id", "alice"), "addr:catty.my.id:alice");
        assert_eq!(msg_key("abc"), "msg:abc");
        assert_eq!(inbox_key("catty.my.id", "alice"), "inbox:catty.my.id:alice");
        assert_eq!(uid_key("INBOX", 42), "imap:uid:INBOX:42");
        assert_eq!(
            last_uid_key("catchall@upstream.example", "INBOX"),
            "imap:last_uid:catchall@upstream.example:INBOX"
        );
        assert_eq!(rate_key("create", "10.0.0.1"), "ratelimit:create:10.0.0.1");
    }
}
