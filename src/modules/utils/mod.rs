// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use uuid::{NoContext, Timestamp, Uuid};

pub mod shutdown;

#[macro_export]
macro_rules! cattymail_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! utc_now {
    () => {{
        use chrono::Utc;
        Utc::now().timestamp_millis()
    }};
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::CattyMailError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

/// UUIDv7 message ids: time-ordered, lexicographically sortable as strings,
/// unique with overwhelming probability across processes.
pub fn message_id() -> String {
    Uuid::new_v7(Timestamp::now(NoContext)).to_string()
}

#[cfg(test)]
mod tests {
    use super::message_id;

    #[test]
    fn message_ids_are_sortable_by_creation() {
        let first = message_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = message_id();
        assert!(first < second);
    }

    #[test]
    fn message_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(message_id()));
        }
    }
}
