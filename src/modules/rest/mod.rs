// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::error::ErrorCapture;
use crate::modules::common::expiry::ServiceExpiryGate;
use crate::modules::common::log::Tracing;
use crate::modules::common::signal::SIGNAL_MANAGER;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::CattyMailResult;
use crate::modules::rest::public::status::{get_status, healthz, readyz};
use crate::modules::rest::public::stream::stream_inbox;
use crate::modules::settings::cli::SETTINGS;
use crate::raise_error;

use super::error::ApiErrorResponse;
use api::create_openapi_service;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{EndpointExt, Route, Server};
use std::time::Duration;

pub mod api;
pub mod public;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    CattyMail is a disposable email gateway.

    - Claim a short-lived address under one of the catch-all domains, random or custom.
    - Read its inbox over JSON; subscribe to the SSE stream for new-message hints.
    - Everything expires on its own after the retention window.
"#;

pub async fn start_http_server() -> CattyMailResult<()> {
    let listener = TcpListener::bind((
        SETTINGS.cattymail_bind_ip.clone(),
        SETTINGS.cattymail_http_port,
    ));

    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .summary("A disposable email gateway over a catch-all IMAP mailbox");

    let swagger = api_service.swagger_ui();
    let redoc = api_service.redoc();
    let spec_json = api_service.spec_endpoint();

    let open_api_route = Route::new()
        .nest_no_strip("/api", api_service)
        .with(ErrorCapture)
        .with(Tracing);

    let mut cors = Cors::new()
        .allow_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allow_headers(vec!["Content-Type", "Authorization"])
        .max_age(SETTINGS.cattymail_cors_max_age);
    if !SETTINGS.cattymail_cors_origins.contains("*") {
        cors = cors.allow_origins(SETTINGS.cattymail_cors_origins.clone());
    }

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/redoc", redoc)
        .nest("/api-docs/spec.json", spec_json)
        .at("/api/healthz", get(healthz))
        .at("/api/readyz", get(readyz))
        .at("/api/status", get(get_status))
        .at("/api/stream/:domain/:local", get(stream_inbox))
        .nest_no_strip("/api", open_api_route)
        .with(ServiceExpiryGate)
        .with(cors)
        .with_if(
            SETTINGS.cattymail_http_compression_enabled,
            Compression::new(),
        )
        .with(CatchPanic::new());

    let mut shutdown = SIGNAL_MANAGER.subscribe();
    let server = Server::new(listener)
        .name("CattyMail API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            async move {
                let _ = shutdown.recv().await;
            },
            Some(Duration::from_secs(5)),
        );
    println!(
        "CattyMail API Service is now running on port {}.",
        SETTINGS.cattymail_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
