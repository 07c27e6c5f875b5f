// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use serde::Serialize;

use crate::modules::error::code::ErrorCode;
use crate::modules::message::Message;
use crate::modules::ratelimit::{self, ClientId, RateAction};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;
use crate::modules::store::Store;
use crate::raise_error;

pub struct InboxApi;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Serialize, Object)]
pub struct DomainsResponse {
    pub domains: Vec<String>,
}

#[OpenApi(prefix_path = "/api", tag = "ApiTags::Inbox")]
impl InboxApi {
    /// Returns every domain addresses can currently be claimed under:
    /// the static allow-list plus admin-added dynamic domains.
    #[oai(path = "/domains", method = "get", operation_id = "list_domains")]
    async fn list_domains(&self) -> ApiResult<Json<DomainsResponse>> {
        Ok(Json(DomainsResponse {
            domains: Store::global().merged_domains().await,
        }))
    }

    /// Lists an inbox, newest first.
    ///
    /// `before` is an exclusive upper bound on the message date in epoch
    /// seconds; pass the date of the oldest message seen so far to page
    /// backwards. Zero means no bound. Messages whose record has already
    /// expired are absent from the result, not errors.
    #[oai(
        path = "/inbox/:domain/:local",
        method = "get",
        operation_id = "list_inbox"
    )]
    async fn list_inbox(
        &self,
        domain: Path<String>,
        local: Path<String>,
        /// Page size, 1-100 (default 50). Out-of-range values are rejected.
        limit: Query<Option<usize>>,
        /// Exclusive upper bound on the date score in epoch seconds; 0 means unbounded.
        before: Query<Option<i64>>,
        client: ClientId,
    ) -> ApiResult<Json<Vec<Message>>> {
        ratelimit::enforce(RateAction::Fetch, &client).await?;

        let limit = limit.0.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(raise_error!(
                format!("limit must be between 1 and {}", MAX_LIMIT),
                ErrorCode::InvalidParameter
            )
            .into());
        }
        let before = before.0.unwrap_or(0).max(0);

        let domain = domain.0.trim().to_lowercase();
        let local = local.0.trim().to_lowercase();
        let messages = Store::global()
            .get_inbox(&domain, &local, limit, before)
            .await?;
        Ok(Json(messages))
    }

    /// Fetches a single message by id. Expired records are plain 404s.
    #[oai(path = "/message/:id", method = "get", operation_id = "get_message")]
    async fn get_message(&self, id: Path<String>) -> ApiResult<Json<Message>> {
        let message = Store::global()
            .get_message(&id.0)
            .await?
            .ok_or_else(|| {
                raise_error!("Message not found".into(), ErrorCode::ResourceNotFound)
            })?;
        Ok(Json(message))
    }
}
