use std::collections::BTreeSet;

use baps_types::keys;
use serde::{Deserialize, Serialize};

use crate::error::{VoteError, VoteResult};

/// How many approvals a level needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuorumRule {
    /// A fixed number of approvals, independent of who may vote.
    Fixed { count: u32 },
    /// A fraction of the roster, rounded up (at least one approval).
    Fraction { numerator: u32, denominator: u32 },
    /// Every roster member must approve.
    All,
}

impl Default for QuorumRule {
    fn default() -> Self {
        Self::Fixed { count: 2 }
    }
}

impl QuorumRule {
    /// Two thirds of the roster.
    pub fn two_thirds() -> Self {
        Self::Fraction {
            numerator: 2,
            denominator: 3,
        }
    }

    /// Simple majority of the roster.
    pub fn majority() -> Self {
        Self::Fraction {
            numerator: 1,
            denominator: 2,
        }
    }

    fn needs_roster(&self) -> bool {
        !matches!(self, Self::Fixed { .. })
    }
}

/// Configuration of consensus evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumConfig {
    #[serde(default)]
    pub rule: QuorumRule,
    /// Organizations whose votes count. When absent, every voter counts.
    #[serde(default)]
    pub roster: Option<Vec<String>>,
}

impl QuorumConfig {
    /// A fixed quorum with no roster.
    pub fn fixed(count: u32) -> Self {
        Self {
            rule: QuorumRule::Fixed { count },
            roster: None,
        }
    }

    /// A rule evaluated against an explicit roster.
    pub fn with_roster<I, S>(rule: QuorumRule, roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule,
            roster: Some(roster.into_iter().map(Into::into).collect()),
        }
    }

    /// Check that the rule can be evaluated and the roster is well formed.
    pub fn validate(&self) -> VoteResult<()> {
        match self.rule {
            QuorumRule::Fixed { count } if count == 0 => {
                return Err(VoteError::InvalidConfig("fixed quorum count must be at least 1".into()));
            }
            QuorumRule::Fraction {
                numerator,
                denominator,
            } if numerator == 0 || denominator == 0 || numerator > denominator => {
                return Err(VoteError::InvalidConfig(format!(
                    "quorum fraction {numerator}/{denominator} must lie in (0, 1]"
                )));
            }
            _ => {}
        }

        match &self.roster {
            None if self.rule.needs_roster() => Err(VoteError::InvalidConfig(
                "fraction and all-of quorum rules require a roster".into(),
            )),
            None => Ok(()),
            Some(roster) => {
                if roster.is_empty() {
                    return Err(VoteError::InvalidConfig("roster must not be empty".into()));
                }
                let mut seen = BTreeSet::new();
                for org in roster {
                    keys::validate_segment("roster", org)?;
                    if !seen.insert(org.as_str()) {
                        return Err(VoteError::InvalidConfig(format!(
                            "roster lists {org} more than once"
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Approvals needed to reach consensus.
    pub fn required_approvals(&self) -> u32 {
        let roster_len = self.roster.as_ref().map_or(0, |r| r.len() as u32);
        match self.rule {
            QuorumRule::Fixed { count } => count,
            QuorumRule::Fraction {
                numerator,
                denominator,
            } => {
                let scaled = u64::from(roster_len) * u64::from(numerator);
                let required = scaled.div_ceil(u64::from(denominator.max(1)));
                (required as u32).max(1)
            }
            QuorumRule::All => roster_len.max(1),
        }
    }
}
