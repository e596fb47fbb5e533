use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::keys;

/// A voter's decision on a contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDecision {
    Approved,
    Rejected,
    Pending,
}

impl VoteDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for VoteDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDecision {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "pending" => Ok(Self::Pending),
            other => Err(TypeError::UnknownDecision(other.to_string())),
        }
    }
}

/// A vote cast by one organization on a contract at an approval level.
///
/// Stored under `{contractId}~{voterOrg}`. The level is not part of the key:
/// a voter has exactly one current vote per contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub contract_id: String,
    pub voter_org: String,
    /// Approval stage the vote targets.
    pub level: i64,
    pub decision: VoteDecision,
    #[serde(default)]
    pub rationale: String,
    /// Caller-supplied timestamp, kept verbatim.
    #[serde(default)]
    pub timestamp: String,
}

impl Vote {
    /// Decode and validate a vote payload.
    pub fn from_json(bytes: &[u8]) -> TypeResult<Self> {
        let vote: Vote = serde_json::from_slice(bytes).map_err(|e| TypeError::Malformed {
            what: "vote",
            reason: e.to_string(),
        })?;
        vote.validate()?;
        Ok(vote)
    }

    /// Check that the key segments of this vote are usable.
    pub fn validate(&self) -> TypeResult<()> {
        keys::validate_vote_contract_id(&self.contract_id)?;
        keys::validate_segment("voterOrg", &self.voter_org)
    }

    /// The store key of this vote.
    pub fn key(&self) -> String {
        keys::vote_key(&self.contract_id, &self.voter_org)
    }

    /// Canonical JSON encoding, used both for storage and the
    /// `VoteSubmitted` event payload.
    pub fn to_json(&self) -> TypeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| TypeError::Encode(e.to_string()))
    }

    /// Returns `true` if this vote approves at `level`.
    pub fn approves_at(&self, level: i64) -> bool {
        self.level == level && self.decision == VoteDecision::Approved
    }
}
