// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use redis::AsyncCommands;

use crate::modules::error::CattyMailResult;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::store::{store_err, Store};

// Dynamic configuration keys. These never expire; they are admin state,
// not user state.
pub const KEY_CONFIG_DOMAINS: &str = "config:domains";
pub const KEY_CONFIG_IMAP_HOST: &str = "config:imap:host";
pub const KEY_CONFIG_IMAP_PORT: &str = "config:imap:port";
pub const KEY_CONFIG_IMAP_USER: &str = "config:imap:user";
pub const KEY_CONFIG_IMAP_PASS: &str = "config:imap:pass";

/// Store-resident IMAP settings. When present they override the static
/// settings on every read. The password never leaves the process.
#[derive(Clone, Debug, Object)]
pub struct ImapOverrides {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[oai(skip)]
    pub pass: String,
}

impl Store {
    pub async fn add_domain(&self, domain: &str) -> CattyMailResult<()> {
        let mut conn = self.conn();
        conn.sadd::<_, _, ()>(KEY_CONFIG_DOMAINS, domain.to_lowercase())
            .await
            .map_err(store_err)
    }

    pub async fn remove_domain(&self, domain: &str) -> CattyMailResult<()> {
        let mut conn = self.conn();
        conn.srem::<_, _, ()>(KEY_CONFIG_DOMAINS, domain.to_lowercase())
            .await
            .map_err(store_err)
    }

    /// Admin-added domains. Sorted so callers see a stable order.
    pub async fn dynamic_domains(&self) -> CattyMailResult<Vec<String>> {
        let mut conn = self.conn();
        let mut domains: Vec<String> = conn
            .smembers(KEY_CONFIG_DOMAINS)
            .await
            .map_err(store_err)?;
        domains.sort();
        Ok(domains)
    }

    /// The static allow-list with dynamic additions appended, deduplicated.
    /// A store failure degrades to the static list; the allow-list must not
    /// take the API down with the store.
    pub async fn merged_domains(&self) -> Vec<String> {
        let mut merged = SETTINGS.cattymail_allowed_domains.clone();
        if let Ok(dynamic) = self.dynamic_domains().await {
            for domain in dynamic {
                if !merged.contains(&domain) {
                    merged.push(domain);
                }
            }
        }
        merged
    }

    pub async fn is_allowed_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        self.merged_domains().await.contains(&domain)
    }

    pub async fn set_imap_overrides(&self, overrides: &ImapOverrides) -> CattyMailResult<()> {
        let mut conn = self.conn();
        redis::pipe()
            .set(KEY_CONFIG_IMAP_HOST, &overrides.host)
            .ignore()
            .set(KEY_CONFIG_IMAP_PORT, overrides.port)
            .ignore()
            .set(KEY_CONFIG_IMAP_USER, &overrides.user)
            .ignore()
            .set(KEY_CONFIG_IMAP_PASS, &overrides.pass)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_err)
    }

    /// None means "not configured in the store"; the host is the sentinel
    /// field, matching how the overrides are written.
    pub async fn imap_overrides(&self) -> CattyMailResult<Option<ImapOverrides>> {
        let mut conn = self.conn();
        let (host, port, user, pass): (
            Option<String>,
            Option<u16>,
            Option<String>,
            Option<String>,
        ) = redis::pipe()
            .get(KEY_CONFIG_IMAP_HOST)
            .get(KEY_CONFIG_IMAP_PORT)
            .get(KEY_CONFIG_IMAP_USER)
            .get(KEY_CONFIG_IMAP_PASS)
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;

        match host {
            Some(host) if !host.is_empty() => Ok(Some(ImapOverrides {
                host,
                port: port.unwrap_or(993),
                user: user.unwrap_or_default(),
                pass: pass.unwrap_or_default(),
            })),
            _ => Ok(None),
        }
    }
}
