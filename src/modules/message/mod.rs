// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Duration, Utc};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::modules::settings::cli::SETTINGS;

/// One ingested email, stored as JSON under `msg:{id}` for the retention
/// window and referenced from its inbox index.
#[derive(Clone, Debug, Serialize, Deserialize, Object)]
pub struct Message {
    /// Time-ordered identifier, sortable lexicographically.
    pub id: String,
    pub domain: String,
    pub local: String,
    /// The identified original recipient, normalized to lowercase.
    pub original_to: String,
    pub from: String,
    pub subject: String,
    /// Sender-declared `Date` header, falling back to the server
    /// internal-date when absent or malformed.
    pub date: DateTime<Utc>,
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub html: String,
    /// Source IMAP folder this message was fetched from.
    pub folder: String,
    /// Source IMAP UID within `folder`.
    pub imap_uid: u32,
}

impl Message {
    /// Inbox index score: the message date in epoch seconds.
    pub fn score(&self) -> i64 {
        self.date.timestamp()
    }
}

/// A claimed `(domain, local)` pair with its advisory expiry. The store TTL
/// on the reservation key is authoritative.
#[derive(Clone, Debug, Serialize, Deserialize, Object)]
pub struct Address {
    pub email: String,
    pub local: String,
    pub domain: String,
    pub expires_at: DateTime<Utc>,
}

impl Address {
    pub fn new(domain: &str, local: &str) -> Self {
        Self {
            email: format!("{}@{}", local, domain),
            local: local.to_string(),
            domain: domain.to_string(),
            expires_at: Utc::now() + Duration::seconds(SETTINGS.cattymail_ttl_seconds as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_expiry_is_now_plus_retention() {
        let address = Address::new("catty.my.id", "alice");
        assert_eq!(address.email, "alice@catty.my.id");
        let remaining = (address.expires_at - Utc::now()).num_seconds();
        assert!(remaining > SETTINGS.cattymail_ttl_seconds as i64 - 5);
        assert!(remaining <= SETTINGS.cattymail_ttl_seconds as i64);
    }

    #[test]
    fn html_is_omitted_from_json_when_empty() {
        let message = Message {
            id: "0191a0b0-0000-7000-8000-000000000000".into(),
            domain: "catty.my.id".into(),
            local: "alice".into(),
            original_to: "alice@catty.my.id".into(),
            from: "Bob <bob@example.com>".into(),
            subject: "hello".into(),
            date: Utc::now(),
            text: "hi".into(),
            html: String::new(),
            folder: "INBOX".into(),
            imap_uid: 42,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("html").is_none());
        assert_eq!(json["imap_uid"], 42);
    }
}
