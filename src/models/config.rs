use std::fs;
use std::path::Path;
use serde::Deserialize;

use crate::Error;
use crate::models::roles::CredentialId;

/// Role allowed to run `transferroles`.
pub const REQUIRED_ROLE_ID: u64 = 1004617849807065168;
/// Role handed to the member whose roles were moved away.
pub const QUARANTINE_ROLE_ID: u64 = 1066682086490128424;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub token: String,
    pub cmd_prefix: String,
    #[serde(default = "default_required_role")]
    pub required_role_id: u64,
    #[serde(default = "default_quarantine_role")]
    pub quarantine_role_id: u64
}

fn default_required_role() -> u64 {
    REQUIRED_ROLE_ID
}

fn default_quarantine_role() -> u64 {
    QUARANTINE_ROLE_ID
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let config_json = fs::read_to_string(path)
            .map_err(|ex| format!("{} could not be read: {ex}", path.display()))?;
        let config = serde_json::from_str(&config_json)
            .map_err(|ex| format!("{} is malformed: {ex}", path.display()))?;

        Ok(config)
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            required_role: CredentialId(self.required_role_id),
            quarantine_role: CredentialId(self.quarantine_role_id)
        }
    }
}

/// Fixed role ids the transfer command works with. Read once at startup.
#[derive(Debug, Clone, Copy)]
pub struct TransferSettings {
    pub required_role: CredentialId,
    pub quarantine_role: CredentialId
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            required_role: CredentialId(REQUIRED_ROLE_ID),
            quarantine_role: CredentialId(QUARANTINE_ROLE_ID)
        }
    }
}
