// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    InvalidDomain = 10010,
    InvalidLocalPart = 10020,
    ReservedLocalPart = 10030,
    MethodNotAllowed = 10090,

    // Authentication and availability errors (20000–20999)
    PermissionDenied = 20000,
    ServiceExpired = 20010,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,
    AddressPoolExhausted = 30010,
    TooManyRequest = 30020,

    // Network and store errors (40000–40999)
    NetworkError = 40000,
    StoreUnavailable = 40010,
    ConnectionTimeout = 40020,

    // Mail service errors (50000–50999)
    ImapCommandFailed = 50000,
    ImapAuthenticationFailed = 50010,
    EmailParseFailed = 50020,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::InvalidDomain
            | ErrorCode::InvalidLocalPart
            | ErrorCode::ReservedLocalPart => StatusCode::BAD_REQUEST,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::PermissionDenied => StatusCode::UNAUTHORIZED,
            ErrorCode::ServiceExpired => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AddressPoolExhausted => StatusCode::CONFLICT,
            ErrorCode::TooManyRequest => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::NetworkError
            | ErrorCode::StoreUnavailable
            | ErrorCode::ConnectionTimeout
            | ErrorCode::ImapCommandFailed
            | ErrorCode::ImapAuthenticationFailed
            | ErrorCode::EmailParseFailed
            | ErrorCode::InternalError
            | ErrorCode::UnhandledPoemError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
