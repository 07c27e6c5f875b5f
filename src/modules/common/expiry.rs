// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{http::StatusCode, Body, Endpoint, IntoResponse, Middleware, Request, Response, Result};

use crate::modules::settings::cli::SETTINGS;

/// Paths that must keep answering after the sunset date so clients and
/// monitors can learn why everything else is gone.
const EXEMPT_PATHS: [&str; 3] = ["/api/status", "/api/healthz", "/api/readyz"];

pub struct ServiceExpiryGate;

pub struct ServiceExpiryGateEndpoint<E> {
    ep: E,
}

impl<E: Endpoint> Middleware<E> for ServiceExpiryGate {
    type Output = ServiceExpiryGateEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ServiceExpiryGateEndpoint { ep }
    }
}

impl<E: Endpoint> Endpoint for ServiceExpiryGateEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        if !EXEMPT_PATHS.contains(&req.uri().path()) && SETTINGS.service_expired() {
            let body = Body::from_json(serde_json::json!({
                "error": "Service has expired",
            }))
            .map_err(poem::error::InternalServerError)?;
            return Ok(Response::builder()
                .status(StatusCode::SERVICE_UNAVAILABLE)
                .content_type("application/json")
                .body(body));
        }
        Ok(self.ep.call(req).await?.into_response())
    }
}
