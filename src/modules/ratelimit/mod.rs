// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{FromRequest, Request, RequestBody, Result};
use tracing::warn;

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CattyMailResult;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::store::Store;
use crate::raise_error;

#[derive(Copy, Clone, Debug)]
pub enum RateAction {
    Create,
    Fetch,
}

impl RateAction {
    fn as_str(&self) -> &'static str {
        match self {
            RateAction::Create => "create",
            RateAction::Fetch => "fetch",
        }
    }

    fn limit_per_min(&self) -> u32 {
        match self {
            RateAction::Create => SETTINGS.cattymail_rate_limit_create_per_min,
            RateAction::Fetch => SETTINGS.cattymail_rate_limit_fetch_per_min,
        }
    }
}

/// The client identity rate buckets are keyed by: `X-Real-IP`, else the
/// first `X-Forwarded-For` element, else the peer address, port stripped.
#[derive(Clone, Debug)]
pub struct ClientId(pub String);

impl<'a> FromRequest<'a> for ClientId {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        Ok(ClientId(derive_client_id(req)))
    }
}

fn derive_client_id(req: &Request) -> String {
    if let Some(real_ip) = header_value(req, "x-real-ip") {
        return strip_port(&real_ip);
    }
    if let Some(forwarded) = header_value(req, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return strip_port(first);
            }
        }
    }
    req.remote_addr()
        .as_socket_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| req.remote_addr().to_string())
}

fn header_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn strip_port(value: &str) -> String {
    match value.parse::<std::net::SocketAddr>() {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => value.to_string(),
    }
}

/// Enforce the fixed-window bucket for `(action, client)`. Store failures
/// fail open: the request is allowed and the failure logged.
pub async fn enforce(action: RateAction, client: &ClientId) -> CattyMailResult<()> {
    match Store::global()
        .rate_limit(action.as_str(), &client.0, action.limit_per_min())
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => Err(raise_error!(
            "Rate limit exceeded".into(),
            ErrorCode::TooManyRequest
        )),
        Err(e) => {
            warn!("Rate limit check failed, allowing request: {:?}", e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::strip_port;

    #[test]
    fn strips_ports_from_socket_addresses() {
        assert_eq!(strip_port("10.0.0.1:5678"), "10.0.0.1");
        assert_eq!(strip_port("[2001:db8::1]:443"), "2001:db8::1");
    }

    #[test]
    fn leaves_bare_addresses_alone() {
        assert_eq!(strip_port("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
        assert_eq!(strip_port("not-an-ip"), "not-an-ip");
    }
}
