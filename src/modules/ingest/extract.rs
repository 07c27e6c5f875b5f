// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{DateTime, Utc};
use mail_parser::Message;

/// RFC-formatted sender, `Name <addr>` when a display name is present.
pub(crate) fn sender(message: &Message<'_>) -> String {
    message
        .from()
        .and_then(|from| from.first())
        .map(|addr| {
            let email = addr.address.as_deref().unwrap_or_default();
            match addr.name.as_deref() {
                Some(name) if !name.is_empty() => format!("{} <{}>", name, email),
                _ => email.to_string(),
            }
        })
        .unwrap_or_default()
}

pub(crate) fn subject(message: &Message<'_>) -> String {
    message
        .subject()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(No Subject)".to_string())
}

/// The sender-declared Date header, when present and parseable.
pub(crate) fn date(message: &Message<'_>) -> Option<DateTime<Utc>> {
    message
        .date()
        .and_then(|d| DateTime::from_timestamp(d.to_timestamp(), 0))
}

/// Concatenate the text/plain parts into one body and the text/html parts
/// into another. Every other content type is dropped; attachments never
/// reach the store.
pub(crate) fn bodies(message: &Message<'_>) -> (String, String) {
    let mut text = String::new();
    for id in &message.text_body {
        if let Some(contents) = message.part(*id).and_then(|part| part.text_contents()) {
            text.push_str(contents);
        }
    }

    let mut html = String::new();
    for id in &message.html_body {
        if let Some(contents) = message.part(*id).and_then(|part| part.text_contents()) {
            html.push_str(contents);
        }
    }

    (text, html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail_parser::MessageParser;

    const MULTIPART: &str = concat!(
        "From: Bob Example <bob@example.com>\r\n",
        "To: alice@catty.my.id\r\n",
        "Subject: greetings\r\n",
        "Date: Mon, 2 Jun 2025 10:00:00 +0000\r\n",
        "MIME-Version: 1.0\r\n",
        "Content-Type: multipart/alternative; boundary=\"sep\"\r\n",
        "\r\n",
        "--sep\r\n",
        "Content-Type: text/plain; charset=utf-8\r\n",
        "\r\n",
        "hello in plain\r\n",
        "--sep\r\n",
        "Content-Type: text/html; charset=utf-8\r\n",
        "\r\n",
        "<p>hello in html</p>\r\n",
        "--sep--\r\n",
    );

    #[test]
    fn splits_plain_and_html_bodies() {
        let message = MessageParser::new().parse(MULTIPART.as_bytes()).unwrap();
        let (text, html) = bodies(&message);
        assert!(text.contains("hello in plain"));
        assert!(html.contains("<p>hello in html</p>"));
        assert!(!text.contains("html"));
    }

    #[test]
    fn formats_sender_with_display_name() {
        let message = MessageParser::new().parse(MULTIPART.as_bytes()).unwrap();
        assert_eq!(sender(&message), "Bob Example <bob@example.com>");
    }

    #[test]
    fn reads_the_declared_date() {
        let message = MessageParser::new().parse(MULTIPART.as_bytes()).unwrap();
        let date = date(&message).unwrap();
        assert_eq!(date.timestamp(), 1_748_858_400);
    }

    #[test]
    fn missing_subject_gets_a_placeholder() {
        let raw = "From: a@b.c\r\n\r\nbody";
        let message = MessageParser::new().parse(raw.as_bytes()).unwrap();
        assert_eq!(subject(&message), "(No Subject)");
    }
}
