use baps_ledger::LedgerStub;
use baps_notify::SubscriptionDirectory;
use baps_registry::ContractRegistry;
use baps_types::{ApprovalNotice, ContractRecord, Subscriber, Vote};
use baps_votes::{ConsensusOutcome, Tally, VoteLedger};
use serde::Serialize;
use tracing::{debug, warn};

use crate::command::Command;
use crate::config::{BapsConfig, ConfigError};
use crate::error::{DispatchError, DispatchResult};

/// Value returned by a successful invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Vote(Vote),
    Votes(Vec<Vote>),
    Consensus(ConsensusOutcome),
    Tally(Tally),
    Contract(ContractRecord),
    Contracts(Vec<ContractRecord>),
    Subscriber(Subscriber),
    Subscribers(Vec<Subscriber>),
    Broadcast(ApprovalNotice),
}

impl Response {
    /// Bytes handed back to the client.
    ///
    /// A consensus outcome is the bare word `approved` or `pending`; every
    /// other response is JSON.
    pub fn to_bytes(&self) -> DispatchResult<Vec<u8>> {
        match self {
            Self::Consensus(outcome) => Ok(outcome.as_str().as_bytes().to_vec()),
            Self::Vote(v) => json(v),
            Self::Votes(v) => json(v),
            Self::Tally(t) => json(t),
            Self::Contract(c) => json(c),
            Self::Contracts(c) => json(c),
            Self::Subscriber(s) => json(s),
            Self::Subscribers(s) => json(s),
            Self::Broadcast(n) => json(n),
        }
    }
}

fn json<T: Serialize>(value: &T) -> DispatchResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| DispatchError::Encode(e.to_string()))
}

/// Routes invocations to the vote ledger, registry and directory.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    votes: VoteLedger,
    registry: ContractRegistry,
    directory: SubscriptionDirectory,
}

impl Dispatcher {
    pub fn new(config: BapsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            votes: VoteLedger::new(config.quorum)?,
            registry: ContractRegistry::new(config.registry),
            directory: SubscriptionDirectory::new(),
        })
    }

    /// Parse `function` with `args` and execute it against `stub`.
    pub fn dispatch(
        &self,
        stub: &mut dyn LedgerStub,
        function: &str,
        args: &[String],
    ) -> DispatchResult<Response> {
        let command = Command::parse(function, args).inspect_err(|e| {
            warn!(function, error = %e, "invocation rejected");
        })?;
        self.execute(stub, command)
    }

    /// Execute an already parsed command.
    pub fn execute(&self, stub: &mut dyn LedgerStub, command: Command) -> DispatchResult<Response> {
        let name = command.name();
        debug!(function = name, read_only = command.is_read_only(), "dispatching");

        let response = match command {
            Command::SubmitVote { payload } => Response::Vote(self.votes.submit_vote(stub, &payload)?),
            Command::CheckConsensus { contract_id, level } => {
                Response::Consensus(self.votes.check_consensus(stub, &contract_id, level)?)
            }
            Command::RegisterContract { payload } => {
                Response::Contract(self.registry.register_contract(stub, &payload)?)
            }
            Command::UpdateStatus {
                contract_id,
                status,
            } => Response::Contract(self.registry.update_status(stub, &contract_id, &status)?),
            Command::GetContract { contract_id } => {
                Response::Contract(self.registry.get_contract(stub, &contract_id)?)
            }
            Command::Subscribe { payload } => {
                Response::Subscriber(self.directory.subscribe(stub, &payload)?)
            }
            Command::Broadcast {
                contract_id,
                country,
            } => Response::Broadcast(self.directory.broadcast(stub, &contract_id, &country)?),
            Command::GetSubscribers { country } => {
                Response::Subscribers(self.directory.get_subscribers(stub, &country)?)
            }
            Command::GetVote {
                contract_id,
                voter_org,
            } => Response::Vote(self.votes.get_vote(stub, &contract_id, &voter_org)?),
            Command::GetVotes { contract_id } => {
                Response::Votes(self.votes.votes_for(stub, &contract_id)?)
            }
            Command::GetTally { contract_id, level } => {
                Response::Tally(self.votes.tally(stub, &contract_id, level)?)
            }
            Command::ListContracts => Response::Contracts(self.registry.list_contracts(stub)?),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baps_ledger::{Faults, InMemoryLedger, Invoked};
    use baps_registry::RegistryConfig;
    use baps_types::{ContractStatus, EventKind};
    use baps_votes::QuorumConfig;
    use chrono::{TimeZone, Utc};

    use crate::error::ErrorKind;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn vote(contract: &str, voter: &str, level: i64, decision: &str) -> String {
        format!(
            r#"{{"contractId":"{contract}","voterOrg":"{voter}","level":{level},"decision":"{decision}","rationale":"reviewed","timestamp":"2024-05-01T10:00:00Z"}}"#
        )
    }

    fn call(
        ledger: &InMemoryLedger,
        dispatcher: &Dispatcher,
        function: &str,
        argv: &[&str],
    ) -> DispatchResult<Invoked<Response>> {
        let argv = args(argv);
        ledger.invoke(|stub| dispatcher.dispatch(stub, function, &argv))
    }

    fn query(
        ledger: &InMemoryLedger,
        dispatcher: &Dispatcher,
        function: &str,
        argv: &[&str],
    ) -> DispatchResult<Response> {
        let argv = args(argv);
        ledger.evaluate(|stub| dispatcher.dispatch(stub, function, &argv))
    }

    fn consensus_word(ledger: &InMemoryLedger, dispatcher: &Dispatcher, level: &str) -> String {
        let response = query(ledger, dispatcher, "CheckConsensus", &["C1", level]).unwrap();
        String::from_utf8(response.to_bytes().unwrap()).unwrap()
    }

    fn default_dispatcher() -> Dispatcher {
        Dispatcher::new(BapsConfig::default()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Vote scenario
    // -----------------------------------------------------------------------

    #[test]
    fn latest_vote_wins_scenario() {
        let ledger = InMemoryLedger::new();
        let dispatcher = default_dispatcher();

        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankA", 1, "approved")]).unwrap();
        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankB", 1, "approved")]).unwrap();
        assert_eq!(consensus_word(&ledger, &dispatcher, "1"), "approved");

        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankA", 2, "rejected")]).unwrap();
        assert_eq!(consensus_word(&ledger, &dispatcher, "1"), "pending");

        let tally = query(&ledger, &dispatcher, "GetTally", &["C1", "2"]).unwrap();
        match tally {
            Response::Tally(t) => assert_eq!((t.approved, t.rejected), (0, 1)),
            other => panic!("unexpected response: {other:?}"),
        }

        let stored = query(&ledger, &dispatcher, "GetVote", &["C1", "BankA"]).unwrap();
        match stored {
            Response::Vote(v) => assert_eq!(v.level, 2),
            other => panic!("unexpected response: {other:?}"),
        }

        let events = ledger.events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.event.name == EventKind::VoteSubmitted.as_str()));
    }

    // -----------------------------------------------------------------------
    // Orchestrated approval flow
    // -----------------------------------------------------------------------

    #[test]
    fn consensus_then_status_update_then_broadcast() {
        let ledger = InMemoryLedger::new();
        ledger.pin_clock(Utc.with_ymd_and_hms(2024, 5, 3, 7, 0, 0).unwrap());
        let dispatcher = default_dispatcher();

        call(
            &ledger,
            &dispatcher,
            "RegisterContract",
            &[r#"{"contractId":"C1","bankOrg":"BankA","standardCode":"SS-12","status":"approved","createdAt":"2024-05-01"}"#],
        )
        .unwrap();
        for bank in ["BankB", "BankC"] {
            call(&ledger, &dispatcher, "Subscribe", &[&format!(r#"{{"countryCode":"AE","bankOrg":"{bank}"}}"#)])
                .unwrap();
        }
        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankB", 1, "approved")]).unwrap();
        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankC", 1, "approved")]).unwrap();

        let checkpoint = ledger.height();

        // The orchestrator reads consensus, then moves the contract itself.
        assert_eq!(consensus_word(&ledger, &dispatcher, "1"), "approved");
        let updated = call(&ledger, &dispatcher, "UpdateStatus", &["C1", "approved"]).unwrap();
        match updated.value {
            Response::Contract(record) => {
                assert_eq!(record.status, ContractStatus::Approved);
                assert_eq!(record.last_updated_at, "2024-05-03T07:00:00Z");
            }
            other => panic!("unexpected response: {other:?}"),
        }
        call(&ledger, &dispatcher, "Broadcast", &["C1", "AE"]).unwrap();

        // An off-core consumer pulls the new events and resolves recipients.
        let fresh = ledger.events_since(checkpoint);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].event.name, "ContractApproved");
        let notice = ApprovalNotice::from_event_payload(&fresh[0].event.payload).unwrap();
        assert_eq!(notice, ApprovalNotice::new("C1", "AE"));

        let recipients = query(&ledger, &dispatcher, "GetSubscribers", &[&notice.country]).unwrap();
        let bytes = recipients.to_bytes().unwrap();
        let listed: Vec<Subscriber> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            listed,
            vec![Subscriber::new("AE", "BankB"), Subscriber::new("AE", "BankC")]
        );
        assert_eq!(ledger.open_scans(), 0);
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn error_kinds_reach_the_client() {
        let ledger = InMemoryLedger::new();
        let dispatcher = default_dispatcher();

        let err = call(&ledger, &dispatcher, "SubmitVote", &["{oops"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = call(&ledger, &dispatcher, "UpdateStatus", &["C404", "approved"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = query(&ledger, &dispatcher, "Transfer", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        call(
            &ledger,
            &dispatcher,
            "RegisterContract",
            &[r#"{"contractId":"C1","bankOrg":"BankA","standardCode":"SS-12"}"#],
        )
        .unwrap();
        call(&ledger, &dispatcher, "UpdateStatus", &["C1", "rejected"]).unwrap();
        let err = call(&ledger, &dispatcher, "UpdateStatus", &["C1", "approved"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalTransition);

        ledger.set_faults(Faults {
            fail_reads: true,
            ..Faults::default()
        });
        let err = query(&ledger, &dispatcher, "ListContracts", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Ledger);
    }

    #[test]
    fn failed_invocation_commits_nothing() {
        let ledger = InMemoryLedger::new();
        let dispatcher = default_dispatcher();
        let height = ledger.height();
        assert!(call(&ledger, &dispatcher, "Broadcast", &["C1", "A~E"]).is_err());
        assert_eq!(ledger.height(), height);
        assert!(ledger.events().is_empty());
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn configured_policies_apply() {
        let ledger = InMemoryLedger::new();
        let dispatcher = Dispatcher::new(BapsConfig {
            quorum: QuorumConfig::fixed(3),
            registry: RegistryConfig::rejecting_reregistration(),
        })
        .unwrap();

        for bank in ["BankA", "BankB"] {
            call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", bank, 1, "approved")]).unwrap();
        }
        assert_eq!(consensus_word(&ledger, &dispatcher, "1"), "pending");
        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankC", 1, "approved")]).unwrap();
        assert_eq!(consensus_word(&ledger, &dispatcher, "1"), "approved");

        let payload = r#"{"contractId":"C1","bankOrg":"BankA","standardCode":"SS-12"}"#;
        call(&ledger, &dispatcher, "RegisterContract", &[payload]).unwrap();
        let err = call(&ledger, &dispatcher, "RegisterContract", &[payload]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalTransition);
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = BapsConfig {
            quorum: QuorumConfig::fixed(0),
            ..BapsConfig::default()
        };
        assert!(Dispatcher::new(config).is_err());
    }

    #[test]
    fn list_queries_return_json_arrays() {
        let ledger = InMemoryLedger::new();
        let dispatcher = default_dispatcher();
        call(&ledger, &dispatcher, "SubmitVote", &[&vote("C1", "BankA", 1, "pending")]).unwrap();

        let votes = query(&ledger, &dispatcher, "GetVotes", &["C1"]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&votes.to_bytes().unwrap()).unwrap();
        assert_eq!(value[0]["voterOrg"], "BankA");
        assert_eq!(value[0]["decision"], "pending");

        let contracts = query(&ledger, &dispatcher, "ListContracts", &[]).unwrap();
        assert_eq!(contracts.to_bytes().unwrap(), b"[]".to_vec());
    }
}
