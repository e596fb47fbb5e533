//! Invocation surface of the BAPS approval core.
//!
//! The Ledger Service routes each client invocation, a function name plus
//! string arguments, to [`Dispatcher::dispatch`], which parses it into a
//! [`Command`] and runs it against the invocation's [`LedgerStub`].
//!
//! ```rust
//! use baps_dispatch::{BapsConfig, Dispatcher, Response};
//! use baps_ledger::InMemoryLedger;
//!
//! let ledger = InMemoryLedger::new();
//! let dispatcher = Dispatcher::new(BapsConfig::default()).unwrap();
//!
//! let args = vec![r#"{"countryCode":"AE","bankOrg":"BankA"}"#.to_string()];
//! ledger
//!     .invoke(|stub| dispatcher.dispatch(stub, "Subscribe", &args))
//!     .unwrap();
//!
//! let listed = ledger
//!     .evaluate(|stub| dispatcher.dispatch(stub, "GetSubscribers", &["AE".to_string()]))
//!     .unwrap();
//! assert!(matches!(listed, Response::Subscribers(ref s) if s.len() == 1));
//! ```
//!
//! [`LedgerStub`]: baps_ledger::LedgerStub

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;

pub use command::Command;
pub use config::{BapsConfig, ConfigError};
pub use dispatcher::{Dispatcher, Response};
pub use error::{DispatchError, DispatchResult, ErrorKind};
