use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Names of the events emitted by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A vote was stored. Payload: the vote JSON.
    VoteSubmitted,
    /// A contract approval was broadcast. Payload: [`ApprovalNotice`].
    ContractApproved,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VoteSubmitted => "VoteSubmitted",
            Self::ContractApproved => "ContractApproved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VoteSubmitted" => Ok(Self::VoteSubmitted),
            "ContractApproved" => Ok(Self::ContractApproved),
            other => Err(TypeError::Malformed {
                what: "event name",
                reason: format!("unknown event {other:?}"),
            }),
        }
    }
}

/// Payload of the `ContractApproved` event: `{contractId, country}`.
///
/// Consumers resolve the recipients themselves by querying the subscriber
/// directory for `country`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalNotice {
    #[serde(rename = "contractId")]
    pub contract_id: String,
    pub country: String,
}

impl ApprovalNotice {
    pub fn new(contract_id: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            country: country.into(),
        }
    }

    pub fn to_event_payload(&self) -> TypeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TypeError::Encode(e.to_string()))
    }

    pub fn from_event_payload(bytes: &[u8]) -> TypeResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Malformed {
            what: "approval notice",
            reason: e.to_string(),
        })
    }
}
