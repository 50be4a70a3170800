//! Wallet session, record snapshot and per-action transaction wrappers.

use chrono::{DateTime, Utc};
use lending_projection::{credit_gate_for, project_at, DashboardSummary};
use lending_types::{unix_secs, Address, Collateral, Loan, Profile, ProjectedState};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ActionError;
use crate::transaction::{Argument, TransactionBuilder, Transition};
use crate::wallet::{TxResult, WalletConnector};

const SECONDS_PER_DAY: u64 = 86_400;
const MAX_EXTENSION_DAYS: u64 = 30;
const MIN_SPLIT_PARTS: u64 = 2;
const MAX_INTEREST_BPS: u32 = 5_000;

/// Source of "now" for timestamps appended to transitions and for overdue checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Principal, rate and term of a plain loan offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoanTerms {
    pub amount: u64,
    /// Basis points
    pub interest: u32,
    pub duration_days: u64,
}

impl LoanTerms {
    fn validate(&self) -> Result<(), ActionError> {
        if self.amount == 0 {
            return Err(invalid("amount", "must be positive"));
        }
        if self.duration_days == 0 {
            return Err(invalid("duration_days", "must be positive"));
        }
        Ok(())
    }
}

/// Requirements a borrower must prove to accept a credit-gated offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditRequirements {
    pub min_credit_score: u32,
    pub collateral_amount: u64,
    /// Percent of principal
    pub collateral_ratio: u32,
}

/// Parameters of a collateral lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollateralLock {
    /// Loan identifier; only its digits are kept
    pub loan_id: String,
    pub amount: u64,
    pub token_type: u8,
    pub duration_days: u64,
}

/// A connected lending session.
///
/// Owns the wallet connector, the connected identity and the current
/// [`ProjectedState`] snapshot. The snapshot is replaced wholesale by
/// [`fetch_records`](Self::fetch_records) and never mutated in place.
/// Fetching takes `&mut self`, so fetches on one client cannot overlap;
/// submissions take `&self` and are not coordinated with each other.
pub struct LendingClient<W, C = SystemClock> {
    config: ClientConfig,
    builder: TransactionBuilder,
    wallet: W,
    clock: C,
    identity: Option<Address>,
    state: ProjectedState,
}

impl<W: WalletConnector> LendingClient<W> {
    pub fn new(config: ClientConfig, wallet: W) -> Self {
        Self::with_clock(config, wallet, SystemClock)
    }
}

impl<W: WalletConnector, C: Clock> LendingClient<W, C> {
    pub fn with_clock(config: ClientConfig, wallet: W, clock: C) -> Self {
        Self {
            builder: TransactionBuilder::from_config(&config),
            config,
            wallet,
            clock,
            identity: None,
            state: ProjectedState::default(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn identity(&self) -> Option<&Address> {
        self.identity.as_ref()
    }

    pub fn state(&self) -> &ProjectedState {
        &self.state
    }

    pub fn dashboard(&self) -> Option<DashboardSummary> {
        self.identity
            .as_ref()
            .map(|identity| DashboardSummary::compute(&self.state, identity))
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Connect the wallet and sign the welcome message.
    ///
    /// A declined signature is logged and does not fail the connection.
    pub async fn connect(&mut self) -> Result<Address, ActionError> {
        let programs = self.config.program_ids();
        self.wallet
            .connect(&self.config.scope, &self.config.network, &programs)
            .await?;

        if let Err(err) = self
            .wallet
            .sign_message(self.config.welcome_message.as_bytes())
            .await
        {
            warn!(error = %err, "Welcome message was not signed");
        }

        let identity = self
            .wallet
            .public_key()
            .filter(|address| !address.is_empty())
            .ok_or(ActionError::NotConnected)?;
        info!(address = %identity, network = %self.config.network, "Wallet connected");
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    pub fn disconnect(&mut self) {
        if let Some(identity) = self.identity.take() {
            info!(address = %identity, "Wallet disconnected");
        }
        self.state = ProjectedState::default();
    }

    /// Fetch every record of the lending program and replace the snapshot.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn fetch_records(&mut self) -> Result<&ProjectedState, ActionError> {
        let identity = self.identity.clone().ok_or(ActionError::NotConnected)?;
        let batch = self
            .wallet
            .request_record_plaintexts(&self.config.program_id)
            .await?;

        self.state = project_at(Some(&identity), &batch.records, self.clock.now());
        info!(
            records = batch.len(),
            loans = self.state.loans.len(),
            offers = self.state.loan_offers.len(),
            public_offers = self.state.public_offers.len(),
            "Records fetched"
        );
        Ok(&self.state)
    }

    /// Wait for the configured delay, then fetch.
    pub async fn refresh_after_submission(&mut self) -> Result<&ProjectedState, ActionError> {
        let delay = self.config.refresh_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Waiting before refresh");
        tokio::time::sleep(delay).await;
        self.fetch_records().await
    }

    // ── Credit ──────────────────────────────────────────────────────

    pub async fn register_user(&self, identity_commitment: &str) -> Result<TxResult, ActionError> {
        let commitment = required("identity_commitment", identity_commitment)?;
        if !commitment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("identity_commitment", "must be a decimal field element"));
        }
        let args = vec![Argument::Field(commitment.to_string()), self.timestamp()];
        self.submit(Transition::RegisterUser, args).await
    }

    /// Prove the profile's score meets `threshold` for `validity_period` seconds.
    pub async fn generate_credit_proof(
        &self,
        threshold: u32,
        validity_period: u64,
    ) -> Result<TxResult, ActionError> {
        let profile = self.require_profile()?;
        if validity_period == 0 {
            return Err(invalid("validity_period", "must be positive"));
        }
        if threshold > profile.credit_score {
            return Err(ActionError::Precondition(format!(
                "credit score {} is below the threshold {threshold}",
                profile.credit_score
            )));
        }
        let args = vec![
            Argument::Record(profile.record.clone()),
            Argument::U32(threshold),
            Argument::U64(validity_period),
            self.timestamp(),
        ];
        self.submit(Transition::GenerateCreditProof, args).await
    }

    pub async fn lock_collateral(&self, lock: &CollateralLock) -> Result<TxResult, ActionError> {
        required("loan_id", &lock.loan_id)?;
        if lock.amount == 0 {
            return Err(invalid("amount", "must be positive"));
        }
        if lock.duration_days == 0 {
            return Err(invalid("duration_days", "must be positive"));
        }
        let duration_secs = lock
            .duration_days
            .checked_mul(SECONDS_PER_DAY)
            .ok_or_else(|| invalid("duration_days", "too large"))?;

        let args = vec![
            Argument::Field(loan_id_digits(&lock.loan_id)),
            Argument::U64(lock.amount),
            Argument::U8(lock.token_type),
            Argument::U64(duration_secs),
            self.timestamp(),
        ];
        self.submit(Transition::LockCollateral, args).await
    }

    pub async fn release_collateral(&self, collateral: &Collateral) -> Result<TxResult, ActionError> {
        if !collateral.is_active {
            return Err(ActionError::Precondition("collateral is already released".into()));
        }
        if !collateral.is_releasable(self.clock.now()) {
            return Err(ActionError::Precondition(format!(
                "collateral is locked until {}",
                collateral.release_time
            )));
        }
        let args = vec![Argument::Record(collateral.record.clone())];
        self.submit(Transition::ReleaseCollateral, args).await
    }

    pub async fn create_loan_offer_with_credit(
        &self,
        borrower: &str,
        terms: &LoanTerms,
        requirements: &CreditRequirements,
    ) -> Result<TxResult, ActionError> {
        let borrower = required("borrower", borrower)?;
        terms.validate()?;
        let args = vec![
            Argument::Address(Address::new(borrower)),
            Argument::U64(terms.amount),
            Argument::U32(terms.interest),
            Argument::U64(terms.duration_days),
            Argument::U32(requirements.min_credit_score),
            Argument::U64(requirements.collateral_amount),
            Argument::U32(requirements.collateral_ratio),
            self.timestamp(),
        ];
        self.submit(Transition::CreateLoanOfferWithCredit, args).await
    }

    /// Accept a credit-gated offer with the first credential and collateral that satisfy it.
    pub async fn accept_loan_with_credit(&self, offer: &Loan) -> Result<TxResult, ActionError> {
        self.require_profile()?;
        let gate = credit_gate_for(&self.state, offer)?;
        let args = vec![
            Argument::Record(offer.record.clone()),
            Argument::Record(gate.credential.record.clone()),
            Argument::Record(gate.collateral.record.clone()),
            self.timestamp(),
        ];
        self.submit(Transition::AcceptLoanWithCredit, args).await
    }

    pub async fn pay_with_credit_update(
        &self,
        loan: &Loan,
        amount: u64,
    ) -> Result<TxResult, ActionError> {
        let profile = self.require_profile()?;
        positive_amount(amount)?;
        let args = vec![
            Argument::Record(loan.record.clone()),
            Argument::Record(profile.record.clone()),
            Argument::U64(amount),
            self.timestamp(),
        ];
        self.submit(Transition::PayWithCreditUpdate, args).await
    }

    /// Repay a loan, updating the credit profile when one exists.
    pub async fn repay(&self, loan: &Loan, amount: u64) -> Result<TxResult, ActionError> {
        if self.state.profile.is_some() {
            self.pay_with_credit_update(loan, amount).await
        } else {
            self.pay(loan, amount).await
        }
    }

    // ── Loans ───────────────────────────────────────────────────────

    /// Create a private loan offer addressed to `borrower`.
    pub async fn lend(&self, borrower: &str, terms: &LoanTerms) -> Result<TxResult, ActionError> {
        let borrower = required("borrower", borrower)?;
        terms.validate()?;
        let args = vec![
            Argument::Address(Address::new(borrower)),
            Argument::U64(terms.amount),
            Argument::U32(terms.interest),
            Argument::U64(terms.duration_days),
        ];
        self.submit(Transition::Lend, args).await
    }

    pub async fn send_offer(&self, offer: &Loan, recipient: &str) -> Result<TxResult, ActionError> {
        let recipient = required("recipient", recipient)?;
        let args = vec![
            Argument::Record(offer.record.clone()),
            Argument::Address(Address::new(recipient)),
        ];
        self.submit(Transition::SendOffer, args).await
    }

    /// Accept a private offer.
    pub async fn borrow(&self, offer: &Loan) -> Result<TxResult, ActionError> {
        let args = vec![Argument::Record(offer.record.clone()), self.timestamp()];
        self.submit(Transition::Borrow, args).await
    }

    pub async fn pay(&self, loan: &Loan, amount: u64) -> Result<TxResult, ActionError> {
        positive_amount(amount)?;
        let args = vec![
            Argument::Record(loan.record.clone()),
            Argument::U64(amount),
            self.timestamp(),
        ];
        self.submit(Transition::Pay, args).await
    }

    pub async fn extend(&self, loan: &Loan, extra_days: u64) -> Result<TxResult, ActionError> {
        if !(1..=MAX_EXTENSION_DAYS).contains(&extra_days) {
            return Err(invalid("extra_days", "must be between 1 and 30"));
        }
        let args = vec![
            Argument::Record(loan.record.clone()),
            Argument::U64(extra_days),
            self.timestamp(),
        ];
        self.submit(Transition::Extend, args).await
    }

    pub async fn split(&self, loan: &Loan, parts: u64) -> Result<TxResult, ActionError> {
        if parts < MIN_SPLIT_PARTS {
            return Err(invalid("parts", "must be at least 2"));
        }
        let args = vec![Argument::Record(loan.record.clone()), Argument::U64(parts)];
        self.submit(Transition::Split, args).await
    }

    /// Transfer a loan to `new_borrower`, paying `fee` to the lender.
    pub async fn swap(
        &self,
        loan: &Loan,
        new_borrower: &str,
        fee: u64,
    ) -> Result<TxResult, ActionError> {
        let new_borrower = required("new_borrower", new_borrower)?;
        let args = vec![
            Argument::Record(loan.record.clone()),
            Argument::Address(Address::new(new_borrower)),
            Argument::U64(fee),
            self.timestamp(),
        ];
        self.submit(Transition::Swap, args).await
    }

    // ── Offers ──────────────────────────────────────────────────────

    pub async fn list_offer(&self, terms: &LoanTerms) -> Result<TxResult, ActionError> {
        terms.validate()?;
        let args = vec![
            Argument::U64(terms.amount),
            Argument::U32(terms.interest),
            Argument::U64(terms.duration_days),
        ];
        self.submit(Transition::ListOffer, args).await
    }

    pub async fn accept_public_offer(&self, offer: &Loan) -> Result<TxResult, ActionError> {
        let args = vec![Argument::Record(offer.record.clone()), self.timestamp()];
        self.submit(Transition::AcceptPublicOffer, args).await
    }

    /// Change an offer's rate, in basis points.
    pub async fn update_interest(
        &self,
        offer: &Loan,
        new_interest: u32,
    ) -> Result<TxResult, ActionError> {
        if new_interest > MAX_INTEREST_BPS {
            return Err(invalid("interest", "must be between 0 and 5000"));
        }
        let args = vec![Argument::Record(offer.record.clone()), Argument::U32(new_interest)];
        self.submit(Transition::UpdateInterest, args).await
    }

    pub async fn cancel_offer(&self, offer: &Loan) -> Result<TxResult, ActionError> {
        let args = vec![Argument::Record(offer.record.clone())];
        self.submit(Transition::CancelOffer, args).await
    }

    pub async fn reject_offer(&self, offer: &Loan) -> Result<TxResult, ActionError> {
        let args = vec![Argument::Record(offer.record.clone())];
        self.submit(Transition::RejectOffer, args).await
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn submit(
        &self,
        transition: Transition,
        args: Vec<Argument>,
    ) -> Result<TxResult, ActionError> {
        let signer = self.identity.as_ref().ok_or(ActionError::NotConnected)?;
        let request = self.builder.call(signer, transition, &args)?;
        debug!(function = %transition, inputs = args.len(), "Submitting transaction");

        match self.wallet.request_transaction(&request).await {
            Ok(result) => {
                info!(
                    function = %transition,
                    transaction_id = %result.transaction_id,
                    "Transaction submitted"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(function = %transition, error = %err, "Transaction failed");
                Err(err.into())
            }
        }
    }

    fn require_profile(&self) -> Result<&Profile, ActionError> {
        self.state.profile.as_ref().ok_or(ActionError::NotRegistered)
    }

    fn timestamp(&self) -> Argument {
        Argument::U64(unix_secs(self.clock.now()))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ActionError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ActionError::MissingInput(field))
    } else {
        Ok(value)
    }
}

fn invalid(field: &'static str, reason: &str) -> ActionError {
    ActionError::InvalidInput {
        field,
        reason: reason.to_string(),
    }
}

fn positive_amount(amount: u64) -> Result<(), ActionError> {
    if amount == 0 {
        return Err(invalid("amount", "repayment must be positive"));
    }
    Ok(())
}

/// Reduce a loan identifier to its decimal digits for use as a field element.
fn loan_id_digits(loan_id: &str) -> String {
    let digits: String = loan_id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        "0".to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loan_id_digits_keeps_only_digits() {
        assert_eq!(loan_id_digits("loan_12ab3"), "123");
        assert_eq!(loan_id_digits("abc"), "0");
        assert_eq!(loan_id_digits("42"), "42");
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("borrower", "  aleo1x "), Ok("aleo1x"));
        assert_eq!(
            required("borrower", "   "),
            Err(ActionError::MissingInput("borrower"))
        );
    }

    #[test]
    fn loan_terms_validation() {
        let terms = LoanTerms {
            amount: 1_000,
            interest: 0,
            duration_days: 30,
        };
        assert!(terms.validate().is_ok());
        assert!(LoanTerms { amount: 0, ..terms.clone() }.validate().is_err());
        assert!(LoanTerms { duration_days: 0, ..terms }.validate().is_err());
    }
}
