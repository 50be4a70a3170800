//! CLI command implementations

pub mod dry_run;
pub mod view;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use lending_client::ClientConfig;
use lending_projection::project_at;
use lending_types::{Address, ProjectedState, RawRecord};

use crate::output::OutputFormat;

/// Inputs shared by every record-reading command.
pub struct Context {
    pub config: ClientConfig,
    pub identity: Option<Address>,
    pub records: Vec<RawRecord>,
    pub now: DateTime<Utc>,
    pub format: OutputFormat,
}

impl Context {
    pub fn require_identity(&self) -> Result<&Address> {
        match &self.identity {
            Some(identity) if !identity.is_empty() => Ok(identity),
            _ => bail!("this command needs the wallet address: pass --identity"),
        }
    }

    pub fn project(&self) -> ProjectedState {
        project_at(self.identity.as_ref(), &self.records, self.now)
    }
}
