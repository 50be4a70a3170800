//! # lending-client
//!
//! Wallet-facing side of the private lending front-end.
//!
//! - [`LendingClient`] holds the wallet session, the connected identity and
//!   the current [`ProjectedState`](lending_types::ProjectedState) snapshot,
//!   and exposes one method per lending transition.
//! - [`TransactionBuilder`] encodes a transition name and ordered typed
//!   arguments into the request shape the wallet signs and broadcasts.
//! - [`WalletConnector`] is the seam to the wallet extension;
//!   [`mocks::MockWallet`] is an in-memory implementation.
//!
//! Every action validates its inputs and preconditions before any wallet
//! call. Failures are scoped to one action and classified by
//! [`ActionError::class`].

pub mod client;
pub mod config;
pub mod error;
pub mod mocks;
pub mod transaction;
pub mod wallet;

pub use client::{
    Clock, CollateralLock, CreditRequirements, FixedClock, LendingClient, LoanTerms, SystemClock,
};
pub use config::ClientConfig;
pub use error::{ActionError, ConfigError, FailureClass};
pub use transaction::{
    Argument, TransactionBuilder, TransactionRequest, Transition, TransitionCall, DEFAULT_FEE,
};
pub use wallet::{TxResult, WalletConnector, WalletError};
