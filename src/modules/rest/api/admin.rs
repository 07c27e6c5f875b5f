// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use serde::Deserialize;

use crate::modules::common::auth::AdminContext;
use crate::modules::error::code::ErrorCode;
use crate::modules::message::Message;
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::settings::cli::SETTINGS;
use crate::modules::store::config::ImapOverrides;
use crate::modules::store::Store;
use crate::raise_error;

pub struct AdminApi;

const LIST_MAX_LIMIT: usize = 200;

#[derive(Debug, Object)]
pub struct AdminStats {
    pub total_addresses: u64,
    pub active_addresses: u64,
    pub total_messages: u64,
    pub messages_last_24h: u64,
    /// Indexed message count per domain.
    pub domains: HashMap<String, u64>,
}

#[derive(Debug, Object)]
pub struct DomainListResponse {
    /// Boot-time allow-list; cannot be removed at runtime.
    pub static_domains: Vec<String>,
    /// Admin-added domains living in the store.
    pub dynamic_domains: Vec<String>,
}

#[derive(Debug, Deserialize, Object)]
pub struct DomainRequest {
    pub domain: String,
}

#[derive(Debug, Deserialize, Object)]
pub struct ImapSettingsRequest {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

#[OpenApi(prefix_path = "/api", tag = "ApiTags::Admin")]
impl AdminApi {
    /// Aggregate counters over the whole store: claimed addresses, stored
    /// messages, and per-domain traffic.
    #[oai(path = "/admin/stats", method = "get", operation_id = "admin_stats")]
    async fn stats(&self, _admin: AdminContext) -> ApiResult<Json<AdminStats>> {
        let store = Store::global();
        Ok(Json(AdminStats {
            total_addresses: store.total_addresses().await?,
            active_addresses: store.active_addresses().await?,
            total_messages: store.total_messages().await?,
            messages_last_24h: store.messages_last_24h().await?,
            domains: store.domain_stats().await?,
        }))
    }

    /// The allow-list split into its static and dynamic halves.
    #[oai(
        path = "/admin/domains",
        method = "get",
        operation_id = "admin_list_domains"
    )]
    async fn list_domains(&self, _admin: AdminContext) -> ApiResult<Json<DomainListResponse>> {
        Ok(Json(DomainListResponse {
            static_domains: SETTINGS.cattymail_allowed_domains.clone(),
            dynamic_domains: Store::global().dynamic_domains().await?,
        }))
    }

    /// Adds a domain to the dynamic allow-list. Takes effect on the next
    /// API read and the next ingestion cycle.
    #[oai(
        path = "/admin/domains",
        method = "post",
        operation_id = "admin_add_domain"
    )]
    async fn add_domain(
        &self,
        request: Json<DomainRequest>,
        _admin: AdminContext,
    ) -> ApiResult<()> {
        let domain = request.0.domain.trim().to_lowercase();
        if domain.is_empty() || domain.contains('@') || !domain.contains('.') {
            return Err(raise_error!(
                "Invalid domain name".into(),
                ErrorCode::InvalidDomain
            )
            .into());
        }
        Ok(Store::global().add_domain(&domain).await?)
    }

    /// Removes a dynamic domain. Static domains are part of the deployment
    /// and are refused here.
    #[oai(
        path = "/admin/domains/:domain",
        method = "delete",
        operation_id = "admin_remove_domain"
    )]
    async fn remove_domain(
        &self,
        domain: Path<String>,
        _admin: AdminContext,
    ) -> ApiResult<()> {
        let domain = domain.0.trim().to_lowercase();
        if SETTINGS.cattymail_allowed_domains.contains(&domain) {
            return Err(raise_error!(
                "Static domains cannot be removed at runtime".into(),
                ErrorCode::InvalidParameter
            )
            .into());
        }
        Ok(Store::global().remove_domain(&domain).await?)
    }

    /// The store-resident IMAP overrides, if any. The password is never
    /// echoed back.
    #[oai(
        path = "/admin/settings",
        method = "get",
        operation_id = "admin_get_settings"
    )]
    async fn get_settings(
        &self,
        _admin: AdminContext,
    ) -> ApiResult<Json<Option<ImapOverrides>>> {
        Ok(Json(Store::global().imap_overrides().await?))
    }

    /// Replaces the IMAP overrides. The ingestor picks them up at the start
    /// of its next cycle.
    #[oai(
        path = "/admin/settings",
        method = "post",
        operation_id = "admin_update_settings"
    )]
    async fn update_settings(
        &self,
        request: Json<ImapSettingsRequest>,
        _admin: AdminContext,
    ) -> ApiResult<()> {
        let request = request.0;
        if request.host.trim().is_empty() {
            return Err(raise_error!(
                "IMAP host must not be empty".into(),
                ErrorCode::InvalidParameter
            )
            .into());
        }
        let overrides = ImapOverrides {
            host: request.host.trim().to_string(),
            port: request.port,
            user: request.user,
            pass: request.pass,
        };
        Ok(Store::global().set_imap_overrides(&overrides).await?)
    }

    /// Currently claimed addresses as `local@domain`, paginated.
    #[oai(
        path = "/admin/addresses",
        method = "get",
        operation_id = "admin_list_addresses"
    )]
    async fn list_addresses(
        &self,
        offset: Query<Option<usize>>,
        limit: Query<Option<usize>>,
        _admin: AdminContext,
    ) -> ApiResult<Json<Vec<String>>> {
        let (offset, limit) = validate_page(offset.0, limit.0)?;
        Ok(Json(Store::global().list_addresses(offset, limit).await?))
    }

    /// Stored message records across all inboxes, paginated.
    #[oai(
        path = "/admin/messages",
        method = "get",
        operation_id = "admin_list_messages"
    )]
    async fn list_messages(
        &self,
        offset: Query<Option<usize>>,
        limit: Query<Option<usize>>,
        _admin: AdminContext,
    ) -> ApiResult<Json<Vec<Message>>> {
        let (offset, limit) = validate_page(offset.0, limit.0)?;
        Ok(Json(Store::global().list_messages(offset, limit).await?))
    }

    /// Deletes a message record and its inbox index entry together.
    #[oai(
        path = "/admin/messages/:id",
        method = "delete",
        operation_id = "admin_delete_message"
    )]
    async fn delete_message(&self, id: Path<String>, _admin: AdminContext) -> ApiResult<()> {
        if !Store::global().delete_message(&id.0).await? {
            return Err(raise_error!(
                "Message not found".into(),
                ErrorCode::ResourceNotFound
            )
            .into());
        }
        Ok(())
    }
}

fn validate_page(
    offset: Option<usize>,
    limit: Option<usize>,
) -> Result<(usize, usize), crate::modules::error::ApiErrorResponse> {
    let offset = offset.unwrap_or(0);
    let limit = limit.unwrap_or(50);
    if limit == 0 || limit > LIST_MAX_LIMIT {
        return Err(raise_error!(
            format!("limit must be between 1 and {}", LIST_MAX_LIMIT),
            ErrorCode::InvalidParameter
        )
        .into());
    }
    Ok((offset, limit))
}
