// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use address::AddressApi;
use admin::AdminApi;
use inbox::InboxApi;
use poem_openapi::{OpenApiService, Tags};

use crate::cattymail_version;

pub mod address;
pub mod admin;
pub mod inbox;

#[derive(Tags)]
pub enum ApiTags {
    Address,
    Inbox,
    Admin,
}

type CattyMailOpenApi = (AddressApi, InboxApi, AdminApi);

pub fn create_openapi_service() -> OpenApiService<CattyMailOpenApi, ()> {
    OpenApiService::new(
        (AddressApi, InboxApi, AdminApi),
        "CattyMail",
        cattymail_version!(),
    )
}
