use poem::{handler, http::StatusCode, web::Json, IntoResponse};
use serde::Serialize;

use crate::modules::settings::cli::SETTINGS;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub expired: bool,
    #[serde(rename = "expirationDate", skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceStatus {
    pub fn current() -> Self {
        let expired = SETTINGS.service_expired();
        ServiceStatus {
            expired,
            expiration_date: SETTINGS
                .expiration_date()
                .map(|date| date.format("%Y-%m-%d").to_string()),
            message: expired.then(|| "This service has expired".to_string()),
        }
    }
}

#[handler]
pub async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

#[handler]
pub async fn readyz() -> impl IntoResponse {
    StatusCode::OK
}

#[handler]
pub async fn get_status() -> impl IntoResponse {
    Json(ServiceStatus::current())
}

#[cfg(test)]
mod tests {
    use super::ServiceStatus;

    #[test]
    fn unexpired_status_omits_the_optional_fields() {
        let status = ServiceStatus::current();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["expired"], false);
        assert!(json.get("expirationDate").is_none());
        assert!(json.get("message").is_none());
    }
}
