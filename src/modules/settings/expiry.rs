// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};

use crate::modules::settings::cli::Settings;

impl Settings {
    /// The configured sunset date, if one was set and parses.
    /// An unparseable value is treated as unset; it must never fail startup.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        self.cattymail_service_expiry_date
            .as_deref()
            .and_then(parse_expiry_date)
    }

    /// The service is expired once local time passes end-of-day of the
    /// configured date.
    pub fn service_expired(&self) -> bool {
        match self.expiration_date() {
            Some(date) => {
                let end_of_day = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
                match Local.from_local_datetime(&end_of_day).earliest() {
                    Some(deadline) => Local::now() > deadline,
                    None => false,
                }
            }
            None => false,
        }
    }
}

fn parse_expiry_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::parse_expiry_date;
    use crate::modules::settings::cli::Settings;
    use chrono::{Datelike, Duration, Local};

    #[test]
    fn parses_day_month_year() {
        let date = parse_expiry_date("28/02/2026").unwrap();
        assert_eq!((date.day(), date.month(), date.year()), (28, 2, 2026));
    }

    #[test]
    fn garbage_dates_are_treated_as_unset() {
        assert!(parse_expiry_date("2026-02-28").is_none());
        assert!(parse_expiry_date("31/13/2026").is_none());
        assert!(parse_expiry_date("soon").is_none());
    }

    #[test]
    fn unset_date_never_expires() {
        let settings = Settings::new_for_test();
        assert!(!settings.service_expired());
    }

    #[test]
    fn past_date_expires_and_future_date_does_not() {
        let mut settings = Settings::new_for_test();

        let yesterday = (Local::now() - Duration::days(2)).date_naive();
        settings.cattymail_service_expiry_date =
            Some(yesterday.format("%d/%m/%Y").to_string());
        assert!(settings.service_expired());

        let tomorrow = (Local::now() + Duration::days(2)).date_naive();
        settings.cattymail_service_expiry_date =
            Some(tomorrow.format("%d/%m/%Y").to_string());
        assert!(!settings.service_expired());
    }
}
