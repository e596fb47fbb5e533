use std::collections::BTreeSet;

use baps_ledger::{LedgerEvent, LedgerStub};
use baps_types::{keys, EventKind, Vote, VoteDecision};
use tracing::{debug, info, warn};

use crate::config::QuorumConfig;
use crate::error::{VoteError, VoteResult};
use crate::tally::{ConsensusOutcome, Tally};

/// Records votes and evaluates consensus over them.
///
/// Holds no state of its own beyond the quorum configuration; every
/// operation works through the [`LedgerStub`] of the current invocation.
#[derive(Clone, Debug)]
pub struct VoteLedger {
    roster: Option<BTreeSet<String>>,
    required: u32,
}

impl VoteLedger {
    /// Build a vote ledger, validating the quorum configuration.
    pub fn new(config: QuorumConfig) -> VoteResult<Self> {
        config.validate()?;
        let roster = config
            .roster
            .as_ref()
            .map(|r| r.iter().cloned().collect::<BTreeSet<_>>());
        let required = config.required_approvals();
        Ok(Self { roster, required })
    }

    /// Approvals a level needs to reach consensus.
    pub fn required_approvals(&self) -> u32 {
        self.required
    }

    /// Store a vote and emit `VoteSubmitted`.
    ///
    /// Any earlier vote by the same voter on the same contract is replaced,
    /// whatever level it targeted.
    pub fn submit_vote(&self, stub: &mut dyn LedgerStub, payload: &[u8]) -> VoteResult<Vote> {
        let vote = Vote::from_json(payload)?;
        let encoded = vote.to_json()?;

        stub.put_state(&vote.key(), encoded.clone())?;
        stub.emit_event(LedgerEvent::new(EventKind::VoteSubmitted.as_str(), encoded))?;

        info!(
            contract_id = %vote.contract_id,
            voter = %vote.voter_org,
            level = vote.level,
            decision = %vote.decision,
            "vote recorded"
        );
        Ok(vote)
    }

    /// Decide whether `level` of `contract_id` has reached quorum.
    pub fn check_consensus(
        &self,
        stub: &dyn LedgerStub,
        contract_id: &str,
        level: i64,
    ) -> VoteResult<ConsensusOutcome> {
        let tally = self.tally(stub, contract_id, level)?;
        let outcome = tally.outcome();
        debug!(
            contract_id,
            level,
            approved = tally.approved,
            required = tally.required,
            outcome = %outcome,
            "consensus checked"
        );
        Ok(outcome)
    }

    /// Count the current votes on `contract_id` that target `level`.
    pub fn tally(&self, stub: &dyn LedgerStub, contract_id: &str, level: i64) -> VoteResult<Tally> {
        let mut tally = Tally {
            contract_id: contract_id.to_string(),
            level,
            approved: 0,
            rejected: 0,
            pending: 0,
            ignored: 0,
            required: self.required,
        };

        for vote in self.scan_votes(stub, contract_id)? {
            if vote.level != level {
                continue;
            }
            if !self.counts(&vote.voter_org) {
                debug!(contract_id, voter = %vote.voter_org, "vote outside roster ignored");
                tally.ignored += 1;
                continue;
            }
            match vote.decision {
                VoteDecision::Approved => tally.approved += 1,
                VoteDecision::Rejected => tally.rejected += 1,
                VoteDecision::Pending => tally.pending += 1,
            }
        }

        Ok(tally)
    }

    /// The current vote of `voter_org` on `contract_id`.
    pub fn get_vote(
        &self,
        stub: &dyn LedgerStub,
        contract_id: &str,
        voter_org: &str,
    ) -> VoteResult<Vote> {
        keys::validate_vote_contract_id(contract_id)?;
        keys::validate_segment("voterOrg", voter_org)?;

        let not_found = || VoteError::NotFound {
            contract_id: contract_id.to_string(),
            voter_org: voter_org.to_string(),
        };
        let bytes = stub
            .get_state(&keys::vote_key(contract_id, voter_org))?
            .ok_or_else(not_found)?;
        Ok(Vote::from_json(&bytes)?)
    }

    /// Every current vote on `contract_id`, ordered by voter.
    pub fn votes_for(&self, stub: &dyn LedgerStub, contract_id: &str) -> VoteResult<Vec<Vote>> {
        self.scan_votes(stub, contract_id)
    }

    fn counts(&self, voter_org: &str) -> bool {
        self.roster
            .as_ref()
            .map_or(true, |roster| roster.contains(voter_org))
    }

    fn scan_votes(&self, stub: &dyn LedgerStub, contract_id: &str) -> VoteResult<Vec<Vote>> {
        keys::validate_vote_contract_id(contract_id)?;

        let mut votes = Vec::new();
        for entry in stub.scan_prefix(&keys::vote_prefix(contract_id))? {
            let kv = entry?;
            match Vote::from_json(&kv.value) {
                Ok(vote) if vote.key() == kv.key => votes.push(vote),
                Ok(vote) => warn!(
                    key = %kv.key,
                    stored_key = %vote.key(),
                    "vote stored under a foreign key; skipping"
                ),
                Err(e) => warn!(key = %kv.key, error = %e, "undecodable vote entry; skipping"),
            }
        }
        Ok(votes)
    }
}
