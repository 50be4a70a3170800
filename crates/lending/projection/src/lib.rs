//! # lending-projection
//!
//! Turns the wallet's unordered bag of decrypted records into the client's
//! local view of confidential state.
//!
//! - **Projector**: classifies records by type, strips the tagged-literal
//!   encoding, applies per-field defaults and ownership filtering, and routes
//!   loan offers by discriminant. Pure and infallible; a fresh
//!   [`ProjectedState`](lending_types::ProjectedState) is built on every call.
//! - **Gate**: selects the credential and collateral that satisfy a
//!   credit-gated loan offer (first match in supplied order).
//! - **Views**: dashboard totals, loan table filters, available and own offers,
//!   payment history over a projected state.

pub mod error;
pub mod gate;
pub mod projector;
pub mod views;

pub use error::ProjectionError;
pub use gate::{credit_gate_for, select_credit_gate, GateSelection};
pub use projector::{project, project_at};
pub use views::{
    available_offers, find_loan, find_offer, my_loans, my_offers, payment_history,
    repayable_loans, DashboardSummary, LoanFilter,
};
