use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lending_types::{Address, RawRecord, RecordBatch};

use crate::transaction::TransactionRequest;
use crate::wallet::{TxResult, WalletConnector, WalletError};

/// In-memory wallet for testing and offline use.
///
/// Serves a fixed record set, records every submitted transaction and
/// signed message, and can be scripted to reject transactions or signatures.
pub struct MockWallet {
    address: Address,
    installed: bool,
    refuse_signing: bool,
    reject_with: Option<WalletError>,
    session: Mutex<Session>,
}

#[derive(Default)]
struct Session {
    connected: bool,
    programs: Vec<String>,
    records: Vec<RawRecord>,
    fetches: usize,
    submitted: Vec<TransactionRequest>,
    signed: Vec<Vec<u8>>,
}

impl MockWallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: Address::new(address),
            installed: true,
            refuse_signing: false,
            reject_with: None,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn with_records(self, records: Vec<RawRecord>) -> Self {
        self.set_records(records);
        self
    }

    /// Fail every `request_transaction` with `error`.
    pub fn rejecting(mut self, error: WalletError) -> Self {
        self.reject_with = Some(error);
        self
    }

    pub fn refusing_signatures(mut self) -> Self {
        self.refuse_signing = true;
        self
    }

    /// Behave as if no extension is present.
    pub fn uninstalled(mut self) -> Self {
        self.installed = false;
        self
    }

    /// Replace the records served on the next fetch.
    pub fn set_records(&self, records: Vec<RawRecord>) {
        self.session().records = records;
    }

    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.session().submitted.clone()
    }

    pub fn signed_messages(&self) -> Vec<Vec<u8>> {
        self.session().signed.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.session().fetches
    }

    pub fn connected_programs(&self) -> Vec<String> {
        self.session().programs.clone()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WalletConnector for MockWallet {
    async fn connect(
        &self,
        _scope: &str,
        _network: &str,
        program_ids: &[String],
    ) -> Result<(), WalletError> {
        if !self.installed {
            return Err(WalletError::NotInstalled);
        }
        let mut session = self.session();
        session.connected = true;
        session.programs = program_ids.to_vec();
        Ok(())
    }

    async fn request_record_plaintexts(
        &self,
        _program_id: &str,
    ) -> Result<RecordBatch, WalletError> {
        let mut session = self.session();
        if !session.connected {
            return Err(WalletError::Transport("not connected".into()));
        }
        session.fetches += 1;
        Ok(RecordBatch::new(session.records.clone()))
    }

    async fn request_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxResult, WalletError> {
        if let Some(error) = &self.reject_with {
            return Err(error.clone());
        }
        let mut session = self.session();
        session.submitted.push(request.clone());
        Ok(TxResult {
            transaction_id: format!("at1mock{}", session.submitted.len()),
        })
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError> {
        if self.refuse_signing {
            return Err(WalletError::Rejected("signature declined".into()));
        }
        self.session().signed.push(message.to_vec());
        Ok(message.iter().rev().copied().collect())
    }

    fn public_key(&self) -> Option<Address> {
        self.session().connected.then(|| self.address.clone())
    }
}
