use async_trait::async_trait;
use lending_types::{Address, RecordBatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transaction::TransactionRequest;

/// Failures reported by the wallet extension.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet extension not installed")]
    NotInstalled,

    #[error("request rejected by user: {0}")]
    Rejected(String),

    #[error("broadcast failed: {0}")]
    Broadcast(String),

    #[error("wallet transport error: {0}")]
    Transport(String),
}

/// Wallet acknowledgement of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResult {
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

/// Connection to a browser-style wallet that holds the user's keys and records.
///
/// The connector decrypts records, signs and broadcasts transactions. No
/// call is retried or cancelled by the client; a failure surfaces as a
/// [`WalletError`] on the one action that issued it.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Open a session with decrypt permission `scope` on `network` for `program_ids`.
    async fn connect(
        &self,
        scope: &str,
        network: &str,
        program_ids: &[String],
    ) -> Result<(), WalletError>;

    /// Decrypted plaintexts of every record the wallet holds for `program_id`.
    async fn request_record_plaintexts(&self, program_id: &str)
        -> Result<RecordBatch, WalletError>;

    /// Sign and broadcast a transaction.
    async fn request_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxResult, WalletError>;

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError>;

    /// Address of the connected account, if any.
    fn public_key(&self) -> Option<Address>;
}
