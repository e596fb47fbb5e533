use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::keys;

/// A bank subscribed to approval notices for a country.
///
/// Stored under `sub~{countryCode}~{bankOrg}`, so each pair exists at most
/// once.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub country_code: String,
    pub bank_org: String,
}

impl Subscriber {
    pub fn new(country_code: impl Into<String>, bank_org: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            bank_org: bank_org.into(),
        }
    }

    /// Decode and validate a subscriber payload.
    pub fn from_json(bytes: &[u8]) -> TypeResult<Self> {
        let sub: Subscriber = serde_json::from_slice(bytes).map_err(|e| TypeError::Malformed {
            what: "subscriber",
            reason: e.to_string(),
        })?;
        sub.validate()?;
        Ok(sub)
    }

    pub fn validate(&self) -> TypeResult<()> {
        keys::validate_segment("countryCode", &self.country_code)?;
        keys::validate_segment("bankOrg", &self.bank_org)
    }

    pub fn key(&self) -> String {
        keys::subscriber_key(&self.country_code, &self.bank_org)
    }

    pub fn to_json(&self) -> TypeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TypeError::Encode(e.to_string()))
    }
}
