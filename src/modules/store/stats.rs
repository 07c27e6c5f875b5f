// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use redis::AsyncCommands;

use crate::modules::error::CattyMailResult;
use crate::modules::message::Message;
use crate::modules::store::{store_err, Store};
use crate::utc_now;

impl Store {
    async fn scan_keys(&self, pattern: &str) -> CattyMailResult<Vec<String>> {
        let mut conn = self.conn();
        let mut keys = Vec::new();
        let mut iter: redis::AsyncIter<String> =
            conn.scan_match(pattern).await.map_err(store_err)?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }

    pub async fn total_addresses(&self) -> CattyMailResult<u64> {
        Ok(self.scan_keys("addr:*").await?.len() as u64)
    }

    pub async fn total_messages(&self) -> CattyMailResult<u64> {
        Ok(self.scan_keys("msg:*").await?.len() as u64)
    }

    /// Addresses whose reservation still has time left. Keys without a TTL
    /// should not exist; they are not counted.
    pub async fn active_addresses(&self) -> CattyMailResult<u64> {
        let keys = self.scan_keys("addr:*").await?;
        let mut conn = self.conn();
        let mut count = 0u64;
        for key in keys {
            let ttl: i64 = conn.ttl(&key).await.map_err(store_err)?;
            if ttl > 0 {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Messages indexed in the last 24 hours, summed across all inboxes.
    pub async fn messages_last_24h(&self) -> CattyMailResult<u64> {
        let keys = self.scan_keys("inbox:*").await?;
        let yesterday = utc_now!() / 1000 - 86_400;
        let mut conn = self.conn();
        let mut count = 0u64;
        for key in keys {
            let in_window: u64 = conn
                .zcount(&key, yesterday, "+inf")
                .await
                .map_err(store_err)?;
            count += in_window;
        }
        Ok(count)
    }

    /// Indexed message count per domain, derived from the inbox key shape
    /// `inbox:{domain}:{local}`.
    pub async fn domain_stats(&self) -> CattyMailResult<HashMap<String, u64>> {
        let keys = self.scan_keys("inbox:*").await?;
        let mut conn = self.conn();
        let mut stats: HashMap<String, u64> = HashMap::new();
        for key in keys {
            let mut parts = key.splitn(3, ':');
            let (_, domain) = (parts.next(), parts.next());
            if let Some(domain) = domain {
                let members: u64 = conn.zcard(&key).await.map_err(store_err)?;
                *stats.entry(domain.to_string()).or_default() += members;
            }
        }
        Ok(stats)
    }

    /// Claimed addresses as `local@domain`, paginated over the key scan.
    pub async fn list_addresses(
        &self,
        offset: usize,
        limit: usize,
    ) -> CattyMailResult<Vec<String>> {
        let mut keys = self.scan_keys("addr:*").await?;
        keys.sort();
        Ok(keys
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|key| {
                let mut parts = key.splitn(3, ':');
                let (_, domain, local) = (parts.next(), parts.next()?, parts.next()?);
                Some(format!("{}@{}", local, domain))
            })
            .collect())
    }

    /// Stored messages, paginated over the key scan. Records that expire
    /// between the scan and the fetch are dropped.
    pub async fn list_messages(
        &self,
        offset: usize,
        limit: usize,
    ) -> CattyMailResult<Vec<Message>> {
        let mut keys = self.scan_keys("msg:*").await?;
        keys.sort();
        let page: Vec<String> = keys.into_iter().skip(offset).take(limit).collect();
        if page.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn();
        let values: Vec<Option<String>> = conn.mget(&page).await.map_err(store_err)?;
        Ok(values
            .into_iter()
            .flatten()
            .filter_map(|raw| serde_json::from_str(&raw).ok())
            .collect())
    }
}
