use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of a consensus check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusOutcome {
    Approved,
    Pending,
}

impl ConsensusOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vote counts for one contract at one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub contract_id: String,
    pub level: i64,
    pub approved: u32,
    pub rejected: u32,
    pub pending: u32,
    /// Votes at this level from organizations outside the roster.
    pub ignored: u32,
    /// Approvals needed for consensus.
    pub required: u32,
}

impl Tally {
    pub fn outcome(&self) -> ConsensusOutcome {
        if self.approved >= self.required {
            ConsensusOutcome::Approved
        } else {
            ConsensusOutcome::Pending
        }
    }

    /// Approvals still missing before consensus (0 once reached).
    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.approved)
    }
}
