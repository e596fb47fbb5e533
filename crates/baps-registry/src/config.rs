use serde::{Deserialize, Serialize};

/// What `RegisterContract` does when the contract id is already taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reregistration {
    /// Replace the stored record, resetting it to `on_chain`.
    #[default]
    Overwrite,
    /// Fail with `AlreadyRegistered`.
    Reject,
}

/// Configuration for the contract registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub reregistration: Reregistration,
}

impl RegistryConfig {
    pub fn rejecting_reregistration() -> Self {
        Self {
            reregistration: Reregistration::Reject,
        }
    }
}
