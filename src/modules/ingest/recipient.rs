// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;

use email_address::EmailAddress;
use mail_parser::{HeaderValue, Message};

/// Forwarding headers that carry the original recipient of a catch-all
/// delivery, most reliable first. `To` itself is the last resort: the
/// catch-all address frequently sits there instead of the real recipient.
const RECIPIENT_HEADERS: [&str; 6] = [
    "X-Forwarded-To",
    "Envelope-To",
    "X-Envelope-To",
    "X-Original-To",
    "Delivered-To",
    "To",
];

/// Find the original recipient of a catch-all delivery: the first
/// email-shaped candidate whose domain is on the allow-list, scanning the
/// forwarding headers in priority order and falling back to every parsed
/// `To` address. Returns the normalized (lowercased, trimmed) address.
pub(crate) fn identify(message: &Message<'_>, allowed_domains: &[String]) -> Option<String> {
    for name in RECIPIENT_HEADERS {
        let Some(value) = message.header(name) else {
            continue;
        };
        if let Some(candidate) = header_candidate(value) {
            let email = extract_email_token(&candidate);
            if is_allowed_email(&email, allowed_domains) {
                return Some(normalize(&email));
            }
        }
    }

    // The To header may list several recipients; the priority scan only saw
    // the first. Walk them all before giving up.
    if let Some(to) = message.to() {
        for addr in to.iter() {
            if let Some(email) = addr.address.as_deref() {
                if is_allowed_email(email, allowed_domains) {
                    return Some(normalize(email));
                }
            }
        }
    }

    None
}

fn header_candidate(value: &HeaderValue) -> Option<String> {
    match value {
        HeaderValue::Text(text) => Some(text.to_string()),
        HeaderValue::Address(address) => address
            .first()
            .and_then(|addr| addr.address.as_deref())
            .map(|s| s.to_string()),
        _ => None,
    }
}

/// Pull the address out of `Name <user@domain>` forms; plain strings pass
/// through trimmed.
fn extract_email_token(value: &str) -> String {
    let value = value.trim();
    if let (Some(start), Some(end)) = (value.find('<'), value.find('>')) {
        if start < end {
            return value[start + 1..end].trim().to_string();
        }
    }
    value.to_string()
}

fn is_allowed_email(email: &str, allowed_domains: &[String]) -> bool {
    if EmailAddress::from_str(email.trim()).is_err() {
        return false;
    }
    match email.rsplit_once('@') {
        Some((_, domain)) => {
            let domain = domain.trim().to_lowercase();
            allowed_domains.iter().any(|allowed| *allowed == domain)
        }
        None => false,
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail_parser::MessageParser;

    fn allowed() -> Vec<String> {
        vec!["catty.my.id".to_string(), "cattyprems.top".to_string()]
    }

    fn parse(raw: &str) -> mail_parser::Message<'_> {
        MessageParser::new().parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn forwarding_header_beats_catch_all_to() {
        let raw = concat!(
            "X-Forwarded-To: alice@catty.my.id\r\n",
            "To: catchall@upstream.example\r\n",
            "Subject: x\r\n",
            "\r\n",
            "body",
        );
        let message = parse(raw);
        assert_eq!(
            identify(&message, &allowed()).as_deref(),
            Some("alice@catty.my.id")
        );
    }

    #[test]
    fn angle_bracketed_candidates_are_unwrapped_and_normalized() {
        let raw = concat!(
            "X-Original-To: Alice Test <ALICE@Catty.My.Id>\r\n",
            "To: catchall@upstream.example\r\n",
            "\r\n",
            "body",
        );
        let message = parse(raw);
        assert_eq!(
            identify(&message, &allowed()).as_deref(),
            Some("alice@catty.my.id")
        );
    }

    #[test]
    fn falls_back_to_scanning_every_to_address() {
        let raw = concat!(
            "To: catchall@upstream.example, bob@cattyprems.top\r\n",
            "\r\n",
            "body",
        );
        let message = parse(raw);
        assert_eq!(
            identify(&message, &allowed()).as_deref(),
            Some("bob@cattyprems.top")
        );
    }

    #[test]
    fn unrelated_domains_are_discarded() {
        let raw = concat!(
            "Delivered-To: mallory@evil.example\r\n",
            "To: other@elsewhere.example\r\n",
            "\r\n",
            "body",
        );
        let message = parse(raw);
        assert_eq!(identify(&message, &allowed()), None);
    }

    #[test]
    fn non_email_header_values_are_ignored() {
        let raw = concat!(
            "X-Forwarded-To: not an address\r\n",
            "To: alice@catty.my.id\r\n",
            "\r\n",
            "body",
        );
        let message = parse(raw);
        assert_eq!(
            identify(&message, &allowed()).as_deref(),
            Some("alice@catty.my.id")
        );
    }
}
