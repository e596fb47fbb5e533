use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::keys;

/// Lifecycle status of a registered contract.
///
/// Serialized as `draft`, `on_chain`, `approved`, `rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    OnChain,
    Approved,
    Rejected,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::OnChain => "on_chain",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` for statuses that admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "on_chain" => Ok(Self::OnChain),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(TypeError::UnknownStatus(other.to_string())),
        }
    }
}

/// The stored record of a contract, keyed by `contract~{contractId}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub contract_id: String,
    pub bank_org: String,
    /// Compliance standard the contract was drafted against.
    pub standard_code: String,
    pub status: ContractStatus,
    pub created_at: String,
    /// RFC 3339 UTC timestamp of the last write.
    pub last_updated_at: String,
}

impl ContractRecord {
    /// The store key of this record.
    pub fn key(&self) -> String {
        keys::contract_key(&self.contract_id)
    }

    pub fn from_json(bytes: &[u8]) -> TypeResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Malformed {
            what: "contract record",
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> TypeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TypeError::Encode(e.to_string()))
    }
}

/// Registration input for a contract.
///
/// Accepts the full record payload, but whatever the caller puts in `status`
/// or `lastUpdatedAt` is ignored: the registry decides both.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSubmission {
    pub contract_id: String,
    #[serde(default)]
    pub bank_org: String,
    #[serde(default)]
    pub standard_code: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_updated_at: Option<serde_json::Value>,
}

impl ContractSubmission {
    /// Decode and validate a registration payload.
    pub fn from_json(bytes: &[u8]) -> TypeResult<Self> {
        let submission: ContractSubmission =
            serde_json::from_slice(bytes).map_err(|e| TypeError::Malformed {
                what: "contract record",
                reason: e.to_string(),
            })?;
        keys::validate_segment("contractId", &submission.contract_id)?;
        Ok(submission)
    }

    /// Turn the submission into a record with the given status and update
    /// timestamp.
    pub fn into_record(self, status: ContractStatus, updated_at: String) -> ContractRecord {
        ContractRecord {
            contract_id: self.contract_id,
            bank_org: self.bank_org,
            standard_code: self.standard_code,
            status,
            created_at: self.created_at,
            last_updated_at: updated_at,
        }
    }
}
