// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{error::ResponseError, http::StatusCode, Body, Error, Response};
use tracing::error;

use crate::modules::error::{code::ErrorCode, CattyMailError};

pub mod auth;
pub mod error;
pub mod expiry;
pub mod log;
pub mod signal;
pub mod tls;

#[inline]
fn create_cattymail_error(message: &str, code: ErrorCode) -> CattyMailError {
    CattyMailError::Generic {
        message: message.into(),
        location: snafu::Location::default(),
        code,
    }
}

#[inline]
pub fn create_api_error_response(message: &str, code: ErrorCode) -> Error {
    let cattymail_error = create_cattymail_error(message, code);
    cattymail_error.into()
}

impl ResponseError for CattyMailError {
    fn status(&self) -> StatusCode {
        match self {
            CattyMailError::Generic {
                message: _,
                location: _,
                code,
            } => code.status(),
        }
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        match self {
            CattyMailError::Generic {
                message,
                location,
                code,
            } => {
                error!(
                    error_code = *code as u32,
                    error_message = %message,
                    error_location = ?location
                );

                let body = Body::from_json(serde_json::json!({
                    "code": *code as u32,
                    "message": message.to_string(),
                }))
                .unwrap();

                Response::builder().status(self.status()).body(body)
            }
        }
    }
}
