// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::LazyLock;

use rand::{rng, Rng};
use regex::Regex;

use crate::modules::address::dictionary::GIVEN_NAMES;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::CattyMailResult;
use crate::modules::message::Address;
use crate::modules::store::Store;
use crate::raise_error;

mod dictionary;

/// 3–31 chars, leading alphanumeric, then alphanumerics, dots, underscores
/// and dashes.
static LOCAL_PART_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]{2,30}$").unwrap());

const RESERVED_LOCALS: [&str; 7] = [
    "admin",
    "root",
    "postmaster",
    "support",
    "noreply",
    "abuse",
    "mailer-daemon",
];

const MAX_RANDOM_ATTEMPTS: usize = 5;

/// Synthesize and reserve a random address under `domain`. Collisions are
/// retried a handful of times before giving up.
pub async fn allocate_random(domain: &str) -> CattyMailResult<Address> {
    let domain = validate_domain(domain).await?;

    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let local = random_local();
        if Store::global().reserve_address(&domain, &local).await? {
            return Ok(Address::new(&domain, &local));
        }
    }
    Err(raise_error!(
        "Failed to generate a unique address".into(),
        ErrorCode::AddressPoolExhausted
    ))
}

/// Claim a caller-chosen local-part, or refresh it when already claimed.
/// Refreshing resets the retention window; anyone presenting the same
/// `(domain, local)` shares the inbox by design.
pub async fn allocate_custom(domain: &str, local: &str) -> CattyMailResult<Address> {
    let domain = validate_domain(domain).await?;
    let local = validate_local(local)?;

    Store::global().ensure_address(&domain, &local).await?;
    Ok(Address::new(&domain, &local))
}

async fn validate_domain(domain: &str) -> CattyMailResult<String> {
    let domain = domain.trim().to_lowercase();
    if Store::global().is_allowed_domain(&domain).await {
        Ok(domain)
    } else {
        Err(raise_error!(
            "Domain is not on the allow-list".into(),
            ErrorCode::InvalidDomain
        ))
    }
}

fn validate_local(local: &str) -> CattyMailResult<String> {
    let local = local.trim().to_lowercase();
    if !LOCAL_PART_PATTERN.is_match(&local) {
        return Err(raise_error!(
            "Invalid local-part: must be 3-31 chars, alphanumeric with dots/underscores/dashes, starting alphanumeric".into(),
            ErrorCode::InvalidLocalPart
        ));
    }
    if RESERVED_LOCALS.contains(&local.as_str()) {
        return Err(raise_error!(
            "Local-part is reserved".into(),
            ErrorCode::ReservedLocalPart
        ));
    }
    Ok(local)
}

fn random_local() -> String {
    let mut rng = rng();
    let name = GIVEN_NAMES[rng.random_range(0..GIVEN_NAMES.len())];
    let digits = rng.random_range(10000..100000);
    format!("{}{}", name, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_length_boundaries() {
        assert!(validate_local("ab").is_err());
        assert!(validate_local("abc").is_ok());
        assert!(validate_local(&"a".repeat(31)).is_ok());
        assert!(validate_local(&"a".repeat(32)).is_err());
    }

    #[test]
    fn local_must_start_alphanumeric() {
        assert!(validate_local(".abc").is_err());
        assert!(validate_local("_abc").is_err());
        assert!(validate_local("-abc").is_err());
        assert!(validate_local("0abc").is_ok());
        assert!(validate_local("a.b-c_d").is_ok());
    }

    #[test]
    fn local_is_normalized_before_validation() {
        assert_eq!(validate_local("  ALICE.test ").unwrap(), "alice.test");
    }

    #[test]
    fn reserved_locals_are_rejected() {
        for word in RESERVED_LOCALS {
            assert!(validate_local(word).is_err(), "{} should be reserved", word);
        }
        assert!(validate_local("administrator").is_ok());
    }

    #[test]
    fn random_locals_match_the_custom_pattern() {
        for _ in 0..100 {
            let local = random_local();
            assert!(LOCAL_PART_PATTERN.is_match(&local), "bad local {}", local);
        }
    }
}
