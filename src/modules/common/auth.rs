// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{
    web::headers::{authorization::Bearer, Authorization, HeaderMapExt},
    FromRequest, Request, RequestBody, Result,
};

use crate::modules::{common::create_api_error_response, error::code::ErrorCode};
use crate::modules::settings::cli::SETTINGS;

/// Proof that the request carried the admin bearer token. Admin endpoints
/// take this as a parameter; extraction fails the request with 401.
pub struct AdminContext;

impl<'a> FromRequest<'a> for AdminContext {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        let expected = SETTINGS.cattymail_admin_token.as_deref().ok_or_else(|| {
            create_api_error_response("Admin API is disabled", ErrorCode::PermissionDenied)
        })?;

        let bearer = req
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                create_api_error_response(
                    "Missing admin bearer token",
                    ErrorCode::PermissionDenied,
                )
            })?;

        if bearer.token() != expected {
            return Err(create_api_error_response(
                "Invalid admin bearer token",
                ErrorCode::PermissionDenied,
            ));
        }
        Ok(AdminContext)
    }
}
