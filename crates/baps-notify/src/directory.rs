use baps_ledger::{LedgerEvent, LedgerStub};
use baps_types::{keys, ApprovalNotice, EventKind, Subscriber};
use tracing::{debug, info, warn};

use crate::error::NotifyResult;

/// Per-country subscriber lists plus the approval broadcaster.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubscriptionDirectory;

impl SubscriptionDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Subscribe a bank to approvals for a country.
    ///
    /// Subscribing the same pair again rewrites the same key.
    pub fn subscribe(&self, stub: &mut dyn LedgerStub, payload: &[u8]) -> NotifyResult<Subscriber> {
        let subscriber = Subscriber::from_json(payload)?;
        stub.put_state(&subscriber.key(), subscriber.to_json()?)?;
        info!(
            country = %subscriber.country_code,
            bank_org = %subscriber.bank_org,
            "subscriber recorded"
        );
        Ok(subscriber)
    }

    /// Emit `ContractApproved` for `contract_id` in `country`.
    ///
    /// The subscriber list is not read here.
    pub fn broadcast(
        &self,
        stub: &mut dyn LedgerStub,
        contract_id: &str,
        country: &str,
    ) -> NotifyResult<ApprovalNotice> {
        keys::validate_segment("contractId", contract_id)?;
        keys::validate_segment("countryCode", country)?;

        let notice = ApprovalNotice::new(contract_id, country);
        stub.emit_event(LedgerEvent::new(
            EventKind::ContractApproved.as_str(),
            notice.to_event_payload()?,
        ))?;
        info!(contract_id, country, "approval broadcast");
        Ok(notice)
    }

    /// Subscribers for `country`, ordered by bank.
    pub fn get_subscribers(
        &self,
        stub: &dyn LedgerStub,
        country: &str,
    ) -> NotifyResult<Vec<Subscriber>> {
        keys::validate_segment("countryCode", country)?;

        let mut scan = stub.scan_prefix(&keys::subscriber_prefix(country))?;
        let mut subscribers = Vec::new();
        for entry in scan.by_ref() {
            let kv = entry?;
            match Subscriber::from_json(&kv.value) {
                Ok(sub) if sub.key() == kv.key => subscribers.push(sub),
                Ok(_) => warn!(key = %kv.key, "subscriber stored under a foreign key; skipping"),
                Err(e) => warn!(key = %kv.key, error = %e, "undecodable subscriber entry; skipping"),
            }
        }
        scan.close();

        debug!(country, count = subscribers.len(), "subscribers listed");
        Ok(subscribers)
    }
}
