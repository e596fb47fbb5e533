//! Composite keys for records in the shared store.
//!
//! Keys are `~`-delimited strings that double as scan prefixes:
//!
//! - votes: `{contractId}~{voterOrg}`
//! - contracts: `contract~{contractId}`
//! - subscribers: `sub~{countryCode}~{bankOrg}`
//!
//! A segment must never contain the delimiter, otherwise a prefix scan for
//! one contract or country would pick up records of another.

use crate::error::{TypeError, TypeResult};

/// Separator between key segments.
pub const DELIMITER: char = '~';

/// First segment of every contract record key.
pub const CONTRACT_NAMESPACE: &str = "contract";

/// First segment of every subscriber key.
pub const SUBSCRIBER_NAMESPACE: &str = "sub";

/// Validate a single key segment.
///
/// A valid segment is non-empty and contains neither the `~` delimiter nor
/// control characters.
///
/// # Examples
///
/// ```
/// use baps_types::keys::validate_segment;
///
/// assert!(validate_segment("contractId", "C-2024-001").is_ok());
/// assert!(validate_segment("contractId", "").is_err());
/// assert!(validate_segment("contractId", "C1~BankA").is_err());
/// ```
pub fn validate_segment(field: &'static str, value: &str) -> TypeResult<()> {
    if value.is_empty() {
        return Err(TypeError::InvalidKeySegment {
            field,
            value: value.to_string(),
            reason: "must not be empty".into(),
        });
    }

    if value.contains(DELIMITER) {
        return Err(TypeError::InvalidKeySegment {
            field,
            value: value.to_string(),
            reason: format!("must not contain the key delimiter {DELIMITER:?}"),
        });
    }

    if let Some(ch) = value.chars().find(|c| c.is_control()) {
        return Err(TypeError::InvalidKeySegment {
            field,
            value: value.to_string(),
            reason: format!("contains control character {ch:?}"),
        });
    }

    Ok(())
}

/// Validate the contract id of a vote.
///
/// Besides the segment rules, the id must not name a reserved namespace:
/// the vote key `contract~BankA` would otherwise overwrite the record of
/// contract `BankA`.
pub fn validate_vote_contract_id(contract_id: &str) -> TypeResult<()> {
    validate_segment("contractId", contract_id)?;
    if contract_id == CONTRACT_NAMESPACE || contract_id == SUBSCRIBER_NAMESPACE {
        return Err(TypeError::ReservedNamespace(contract_id.to_string()));
    }
    Ok(())
}

/// Key of the vote cast by `voter_org` on `contract_id`.
pub fn vote_key(contract_id: &str, voter_org: &str) -> String {
    format!("{contract_id}{DELIMITER}{voter_org}")
}

/// Scan prefix covering every vote on `contract_id`.
pub fn vote_prefix(contract_id: &str) -> String {
    format!("{contract_id}{DELIMITER}")
}

/// Key of the record for `contract_id`.
pub fn contract_key(contract_id: &str) -> String {
    format!("{CONTRACT_NAMESPACE}{DELIMITER}{contract_id}")
}

/// Scan prefix covering every contract record.
pub fn contract_prefix() -> String {
    format!("{CONTRACT_NAMESPACE}{DELIMITER}")
}

/// Key of the subscription of `bank_org` to approvals in `country_code`.
pub fn subscriber_key(country_code: &str, bank_org: &str) -> String {
    format!("{SUBSCRIBER_NAMESPACE}{DELIMITER}{country_code}{DELIMITER}{bank_org}")
}

/// Scan prefix covering every subscriber of `country_code`.
pub fn subscriber_prefix(country_code: &str) -> String {
    format!("{SUBSCRIBER_NAMESPACE}{DELIMITER}{country_code}{DELIMITER}")
}
