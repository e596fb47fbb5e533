//! Subscriber directory and approval broadcast for BAPS.
//!
//! Banks subscribe per country. Broadcasting an approval only emits a
//! `ContractApproved` event; delivery is left to whoever consumes the event
//! log, which resolves recipients with [`SubscriptionDirectory::get_subscribers`].

pub mod directory;
pub mod error;

pub use directory::SubscriptionDirectory;
pub use error::{NotifyError, NotifyResult};
