// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod address;
pub mod common;
pub mod context;
pub mod error;
pub mod imap;
pub mod ingest;
pub mod logger;
pub mod message;
pub mod ratelimit;
pub mod rest;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod utils;
