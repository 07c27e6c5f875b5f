// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};
use serde::Deserialize;

use crate::modules::address::{allocate_custom, allocate_random};
use crate::modules::message::Address;
use crate::modules::ratelimit::{self, ClientId, RateAction};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;

pub struct AddressApi;

#[derive(Debug, Deserialize, Object)]
pub struct RandomAddressRequest {
    /// One of the allow-listed catch-all domains.
    pub domain: String,
}

#[derive(Debug, Deserialize, Object)]
pub struct CustomAddressRequest {
    /// One of the allow-listed catch-all domains.
    pub domain: String,
    /// Desired local-part; normalized to lowercase before validation.
    pub local: String,
}

#[OpenApi(prefix_path = "/api", tag = "ApiTags::Address")]
impl AddressApi {
    /// Allocates a random address under the given domain.
    ///
    /// The local-part is synthesized from a name dictionary plus a 5-digit
    /// suffix; a few collisions are retried before answering 409. The
    /// reservation lives for the retention window.
    #[oai(
        path = "/address/random",
        method = "post",
        operation_id = "create_random_address"
    )]
    async fn create_random_address(
        &self,
        request: Json<RandomAddressRequest>,
        client: ClientId,
    ) -> ApiResult<Json<Address>> {
        ratelimit::enforce(RateAction::Create, &client).await?;
        Ok(Json(allocate_random(&request.0.domain).await?))
    }

    /// Claims a chosen local-part, or refreshes it when already claimed.
    ///
    /// Claiming an address that already exists is how its retention window
    /// is extended; the same `(domain, local)` always maps to the same
    /// inbox.
    #[oai(
        path = "/address/custom",
        method = "post",
        operation_id = "create_custom_address"
    )]
    async fn create_custom_address(
        &self,
        request: Json<CustomAddressRequest>,
        client: ClientId,
    ) -> ApiResult<Json<Address>> {
        ratelimit::enforce(RateAction::Create, &client).await?;
        let request = request.0;
        Ok(Json(allocate_custom(&request.domain, &request.local).await?))
    }
}
