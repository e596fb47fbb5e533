use baps_ledger::LedgerStub;
use baps_types::{keys, ContractRecord, ContractStatus, ContractSubmission};
use chrono::SecondsFormat;
use tracing::{debug, info, warn};

use crate::config::{RegistryConfig, Reregistration};
use crate::error::{RegistryError, RegistryResult};
use crate::transitions::can_transition;

/// Stores contract records and moves them through their lifecycle.
#[derive(Clone, Debug, Default)]
pub struct ContractRegistry {
    config: RegistryConfig,
}

impl ContractRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Register a contract in `on_chain`, ignoring any status in the payload.
    ///
    /// `lastUpdatedAt` is taken from the invocation timestamp.
    pub fn register_contract(
        &self,
        stub: &mut dyn LedgerStub,
        payload: &[u8],
    ) -> RegistryResult<ContractRecord> {
        let submission = ContractSubmission::from_json(payload)?;
        let key = keys::contract_key(&submission.contract_id);

        if let Some(existing) = stub.get_state(&key)? {
            if self.config.reregistration == Reregistration::Reject {
                return Err(RegistryError::AlreadyRegistered {
                    contract_id: submission.contract_id,
                });
            }
            let prior = ContractRecord::from_json(&existing)
                .map(|r| r.status.to_string())
                .unwrap_or_else(|_| "undecodable".into());
            warn!(
                contract_id = %submission.contract_id,
                prior_status = %prior,
                "re-registration overwrites existing record"
            );
        }

        let record = submission.into_record(ContractStatus::OnChain, timestamp(stub));
        stub.put_state(&key, record.to_json()?)?;

        info!(
            contract_id = %record.contract_id,
            bank_org = %record.bank_org,
            standard = %record.standard_code,
            "contract registered"
        );
        Ok(record)
    }

    /// Move a contract to `new_status` if the transition table allows it.
    pub fn update_status(
        &self,
        stub: &mut dyn LedgerStub,
        contract_id: &str,
        new_status: &str,
    ) -> RegistryResult<ContractRecord> {
        let mut record = self.get_contract(stub, contract_id)?;
        let to: ContractStatus = new_status.parse()?;
        let from = record.status;

        if !can_transition(from, to) {
            return Err(RegistryError::IllegalTransition {
                contract_id: contract_id.to_string(),
                from,
                to,
            });
        }

        record.status = to;
        record.last_updated_at = timestamp(stub);
        stub.put_state(&record.key(), record.to_json()?)?;

        info!(contract_id, %from, %to, "contract status changed");
        Ok(record)
    }

    /// Look up a contract record.
    pub fn get_contract(
        &self,
        stub: &dyn LedgerStub,
        contract_id: &str,
    ) -> RegistryResult<ContractRecord> {
        keys::validate_segment("contractId", contract_id)?;
        let bytes = stub
            .get_state(&keys::contract_key(contract_id))?
            .ok_or_else(|| RegistryError::NotFound {
                contract_id: contract_id.to_string(),
            })?;
        Ok(ContractRecord::from_json(&bytes)?)
    }

    /// Every contract record, ordered by contract id.
    pub fn list_contracts(&self, stub: &dyn LedgerStub) -> RegistryResult<Vec<ContractRecord>> {
        let mut records = Vec::new();
        for entry in stub.scan_prefix(&keys::contract_prefix())? {
            let kv = entry?;
            match ContractRecord::from_json(&kv.value) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = %kv.key, error = %e, "undecodable contract entry; skipping"),
            }
        }
        debug!(count = records.len(), "contracts listed");
        Ok(records)
    }
}

fn timestamp(stub: &dyn LedgerStub) -> String {
    stub.tx_timestamp().to_rfc3339_opts(SecondsFormat::Secs, true)
}
