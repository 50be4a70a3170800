//! Client configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transaction::DEFAULT_FEE;

const fn default_fee() -> u64 {
    DEFAULT_FEE
}

const fn default_refresh_delay_ms() -> u64 {
    3_000
}

fn default_program_id() -> String {
    "private_lending_credit_complete.aleo".to_string()
}

fn default_network() -> String {
    "testnetbeta".to_string()
}

fn default_scope() -> String {
    "ON_CHAIN_HISTORY".to_string()
}

fn default_extra_programs() -> Vec<String> {
    vec!["credits.aleo".to_string()]
}

fn default_welcome_message() -> String {
    "Welcome to Aleo Private Lending - Zero-Knowledge Credit System".to_string()
}

/// Wallet session and transaction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Lending program whose records are fetched and transitions invoked
    #[serde(default = "default_program_id")]
    pub program_id: String,

    /// Chain id passed to the wallet
    #[serde(default = "default_network")]
    pub network: String,

    /// Decrypt permission requested on connect
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Programs requested alongside `program_id`
    #[serde(default = "default_extra_programs")]
    pub extra_programs: Vec<String>,

    /// Execution fee per transaction, in microcredits
    #[serde(default = "default_fee")]
    pub fee: u64,

    /// Wait before re-fetching records after a submission
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,

    /// Message signed once as a connection handshake
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
            network: default_network(),
            scope: default_scope(),
            extra_programs: default_extra_programs(),
            fee: default_fee(),
            refresh_delay_ms: default_refresh_delay_ms(),
            welcome_message: default_welcome_message(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file. No path, or a path that does not
    /// exist, yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml_str(&contents)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Programs requested on connect: the extras followed by the lending program.
    pub fn program_ids(&self) -> Vec<String> {
        let mut ids = self.extra_programs.clone();
        if !ids.contains(&self.program_id) {
            ids.push(self.program_id.clone());
        }
        ids
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}
