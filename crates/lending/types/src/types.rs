use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RawRecord;

/// Credit score assumed when a profile record carries none.
pub const DEFAULT_CREDIT_SCORE: u32 = 500;

/// Interest rates are expressed in basis points of the principal.
pub const INTEREST_SCALE: u64 = 10_000;

const SECONDS_PER_DAY: i64 = 86_400;

/// Account address - the wallet's public identity string.
///
/// Ownership checks are plain string equality against the connected identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Sub-kind of a `Loan` record, carried on-chain as the `loan_type` discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanKind {
    PrivateOffer,
    ActiveLoan,
    CompletedLoan,
    PaymentProof,
    ClaimedPayment,
    FeeRecord,
    Cancelled,
    PublicOffer,
    /// A discriminant this client does not know yet, including values
    /// outside the on-chain `u8` range
    Unknown(i64),
}

/// Which offer collection, if any, a loan is routed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferRouting {
    PrivateOffers,
    PublicOffers,
    None,
}

impl LoanKind {
    pub fn from_discriminant(value: i64) -> Self {
        match value {
            0 => LoanKind::PrivateOffer,
            1 => LoanKind::ActiveLoan,
            2 => LoanKind::CompletedLoan,
            3 => LoanKind::PaymentProof,
            4 => LoanKind::ClaimedPayment,
            5 => LoanKind::FeeRecord,
            6 => LoanKind::Cancelled,
            7 => LoanKind::PublicOffer,
            other => LoanKind::Unknown(other),
        }
    }

    pub fn discriminant(self) -> i64 {
        match self {
            LoanKind::PrivateOffer => 0,
            LoanKind::ActiveLoan => 1,
            LoanKind::CompletedLoan => 2,
            LoanKind::PaymentProof => 3,
            LoanKind::ClaimedPayment => 4,
            LoanKind::FeeRecord => 5,
            LoanKind::Cancelled => 6,
            LoanKind::PublicOffer => 7,
            LoanKind::Unknown(other) => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanKind::PrivateOffer => "Private Offer",
            LoanKind::ActiveLoan => "Active Loan",
            LoanKind::CompletedLoan => "Completed Loan",
            LoanKind::PaymentProof => "Payment Proof",
            LoanKind::ClaimedPayment => "Claimed Payment",
            LoanKind::FeeRecord => "Fee Record",
            LoanKind::Cancelled => "Cancelled",
            LoanKind::PublicOffer => "Public Offer",
            LoanKind::Unknown(_) => "Unknown",
        }
    }

    pub fn routing(self) -> OfferRouting {
        match self {
            LoanKind::PrivateOffer => OfferRouting::PrivateOffers,
            LoanKind::PublicOffer => OfferRouting::PublicOffers,
            LoanKind::ActiveLoan
            | LoanKind::CompletedLoan
            | LoanKind::PaymentProof
            | LoanKind::ClaimedPayment
            | LoanKind::FeeRecord
            | LoanKind::Cancelled
            | LoanKind::Unknown(_) => OfferRouting::None,
        }
    }

    pub fn is_offer(self) -> bool {
        self.routing() != OfferRouting::None
    }

    /// Payment proofs, claimed payments and fee records.
    pub fn is_payment_record(self) -> bool {
        matches!(
            self,
            LoanKind::PaymentProof | LoanKind::ClaimedPayment | LoanKind::FeeRecord
        )
    }
}

impl std::fmt::Display for LoanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse rating band for a credit score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditRating {
    Poor,
    Average,
    Fair,
    Good,
    Excellent,
}

impl CreditRating {
    pub fn from_score(score: u32) -> Self {
        if score >= 800 {
            CreditRating::Excellent
        } else if score >= 700 {
            CreditRating::Good
        } else if score >= 600 {
            CreditRating::Fair
        } else if score >= 500 {
            CreditRating::Average
        } else {
            CreditRating::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CreditRating::Poor => "Poor",
            CreditRating::Average => "Average",
            CreditRating::Fair => "Fair",
            CreditRating::Good => "Good",
            CreditRating::Excellent => "Excellent",
        }
    }
}

/// The connected user's credit profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub owner: Address,
    pub user_id: String,
    pub credit_score: u32,
    pub total_loans: u32,
    pub successful_repayments: u32,
    pub defaults: u32,
    pub total_borrowed: u64,
    pub total_repaid: u64,
    /// Seconds since epoch
    pub registration_time: u64,
    /// Seconds since epoch
    pub last_update_time: u64,
    /// Source record, resubmitted when a transition consumes the profile
    pub record: Arc<RawRecord>,
}

impl Profile {
    pub fn rating(&self) -> CreditRating {
        CreditRating::from_score(self.credit_score)
    }

    /// Share of loans repaid successfully, rounded to a whole percent.
    pub fn success_rate_percent(&self) -> u32 {
        if self.total_loans == 0 {
            return 0;
        }
        (f64::from(self.successful_repayments) * 100.0 / f64::from(self.total_loans)).round() as u32
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        datetime_from_secs(self.registration_time)
    }
}

/// A `Loan` record: offers, active and completed loans, and payment sub-records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub record: Arc<RawRecord>,
    pub owner: Address,
    pub lender: Address,
    pub borrower: Address,
    pub amount: u64,
    /// Basis points
    pub interest: u32,
    pub repaid: u64,
    /// Seconds since epoch
    pub created: u64,
    /// Seconds since epoch
    pub due_time: u64,
    pub created_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub active: bool,
    pub kind: LoanKind,
    /// Computed at projection time; stale between fetches
    pub overdue: bool,
    pub min_credit_score: u32,
    pub collateral_amount: u64,
    pub collateral_ratio: u32,
    pub has_collateral: bool,
}

impl Loan {
    /// True if `identity` is the lender, borrower or owner.
    pub fn involves(&self, identity: &Address) -> bool {
        self.lender == *identity || self.borrower == *identity || self.owner == *identity
    }

    /// Interest owed on the principal, rounded down.
    pub fn interest_due(&self) -> u64 {
        let due = u128::from(self.amount) * u128::from(self.interest) / u128::from(INTEREST_SCALE);
        u64::try_from(due).unwrap_or(u64::MAX)
    }

    pub fn total_due(&self) -> u64 {
        self.amount.saturating_add(self.interest_due())
    }

    pub fn remaining(&self) -> u64 {
        self.total_due().saturating_sub(self.repaid)
    }

    /// Repaid share of the total due, in percent.
    pub fn repayment_progress(&self) -> f64 {
        let total = self.total_due();
        if total == 0 {
            return 0.0;
        }
        self.repaid as f64 / total as f64 * 100.0
    }

    /// Whole days until the due date, rounded up. Zero until a full day past
    /// due, negative after that.
    pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
        // Raw seconds, so due times past the calendar range stay in the future
        let secs = i128::from(self.due_time) - i128::from(now.timestamp());
        let secs = i64::try_from(secs).unwrap_or(if secs > 0 { i64::MAX } else { i64::MIN });
        let days = secs / SECONDS_PER_DAY;
        if secs % SECONDS_PER_DAY > 0 {
            days + 1
        } else {
            days
        }
    }
}

/// Collateral locked by the user against a loan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collateral {
    pub owner: Address,
    pub loan_id: String,
    pub amount: u64,
    pub token_type: u8,
    /// Seconds since epoch
    pub lock_time: u64,
    /// Seconds since epoch
    pub release_time: u64,
    pub is_active: bool,
    pub record: Arc<RawRecord>,
}

impl Collateral {
    pub fn is_releasable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && unix_secs(now) >= self.release_time
    }
}

/// A zero-knowledge credential attesting a minimum credit score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreditCredential {
    pub owner: Address,
    pub min_score: u32,
    pub proof_hash: String,
    pub validity_period: u64,
    /// Seconds since epoch
    pub issued_time: u64,
    pub nullifier: String,
    pub record: Arc<RawRecord>,
}

impl CreditCredential {
    /// Whether this credential can satisfy a loan gated at `required_min`.
    pub fn satisfies(&self, required_min: u32) -> bool {
        self.min_score <= required_min
    }
}

/// The local view of the user's confidential state, rebuilt on every fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedState {
    pub profile: Option<Profile>,
    pub loans: Vec<Loan>,
    pub loan_offers: Vec<Loan>,
    pub public_offers: Vec<Loan>,
    pub collateral: Vec<Collateral>,
    pub credit_proofs: Vec<CreditCredential>,
}

impl ProjectedState {
    pub fn is_empty(&self) -> bool {
        self.profile.is_none()
            && self.loans.is_empty()
            && self.loan_offers.is_empty()
            && self.public_offers.is_empty()
            && self.collateral.is_empty()
            && self.credit_proofs.is_empty()
    }
}

/// Seconds since epoch to a UTC timestamp; out-of-range values map to the epoch.
pub fn datetime_from_secs(secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .unwrap_or_default()
}

/// Seconds since epoch, clamped at zero.
pub fn unix_secs(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: u64, interest: u32, repaid: u64) -> Loan {
        Loan {
            id: "loan-1".into(),
            record: Arc::new(RawRecord::new("Loan")),
            owner: Address::new("aleo1owner"),
            lender: Address::new("aleo1lender"),
            borrower: Address::new("aleo1borrower"),
            amount,
            interest,
            repaid,
            created: 0,
            due_time: 86_400,
            created_date: datetime_from_secs(0),
            due_date: datetime_from_secs(86_400),
            active: true,
            kind: LoanKind::ActiveLoan,
            overdue: false,
            min_credit_score: 0,
            collateral_amount: 0,
            collateral_ratio: 0,
            has_collateral: false,
        }
    }

    #[test]
    fn discriminants_map_to_named_kinds() {
        for d in 0..=7 {
            let kind = LoanKind::from_discriminant(d);
            assert_eq!(kind.discriminant(), d);
            assert_ne!(kind.label(), "Unknown");
        }
        assert_eq!(LoanKind::from_discriminant(9), LoanKind::Unknown(9));
        assert_eq!(LoanKind::Unknown(9).label(), "Unknown");
        assert_eq!(LoanKind::from_discriminant(300), LoanKind::Unknown(300));
        assert_eq!(LoanKind::from_discriminant(-1), LoanKind::Unknown(-1));
    }

    #[test]
    fn only_offer_kinds_are_routed() {
        assert_eq!(LoanKind::PrivateOffer.routing(), OfferRouting::PrivateOffers);
        assert_eq!(LoanKind::PublicOffer.routing(), OfferRouting::PublicOffers);
        assert_eq!(LoanKind::Cancelled.routing(), OfferRouting::None);
        assert_eq!(LoanKind::Unknown(42).routing(), OfferRouting::None);
        assert!(LoanKind::FeeRecord.is_payment_record());
        assert!(!LoanKind::CompletedLoan.is_payment_record());
    }

    #[test]
    fn credit_rating_bands() {
        assert_eq!(CreditRating::from_score(850), CreditRating::Excellent);
        assert_eq!(CreditRating::from_score(800), CreditRating::Excellent);
        assert_eq!(CreditRating::from_score(799), CreditRating::Good);
        assert_eq!(CreditRating::from_score(600), CreditRating::Fair);
        assert_eq!(CreditRating::from_score(500), CreditRating::Average);
        assert_eq!(CreditRating::from_score(499), CreditRating::Poor);
        assert!(CreditRating::Poor < CreditRating::Excellent);
    }

    #[test]
    fn repayment_figures() {
        let l = loan(1_000, 500, 300);
        assert_eq!(l.interest_due(), 50);
        assert_eq!(l.total_due(), 1_050);
        assert_eq!(l.remaining(), 750);
        assert!((l.repayment_progress() - 300.0 / 1_050.0 * 100.0).abs() < 1e-9);

        let overpaid = loan(100, 0, 500);
        assert_eq!(overpaid.remaining(), 0);
        assert_eq!(loan(0, 0, 0).repayment_progress(), 0.0);
    }

    #[test]
    fn interest_due_saturates() {
        let l = loan(u64::MAX, u32::MAX, 0);
        assert_eq!(l.interest_due(), u64::MAX);
        assert_eq!(l.total_due(), u64::MAX);
    }

    #[test]
    fn days_until_due_rounds_up() {
        let l = loan(1, 0, 0);
        assert_eq!(l.days_until_due(datetime_from_secs(0)), 1);
        assert_eq!(l.days_until_due(datetime_from_secs(1)), 1);
        assert_eq!(l.days_until_due(datetime_from_secs(86_400)), 0);
        assert_eq!(l.days_until_due(datetime_from_secs(86_400 * 2 + 10)), -1);
        // Within the first day past due
        assert_eq!(l.days_until_due(datetime_from_secs(86_400 + 10)), 0);
    }

    #[test]
    fn days_until_due_beyond_calendar_range() {
        let mut l = loan(1, 0, 0);
        l.due_time = 10_000_000_000_000;
        l.due_date = datetime_from_secs(l.due_time);
        assert!(l.days_until_due(datetime_from_secs(1_700_000_000)) > 100_000_000);
    }

    #[test]
    fn loan_involvement() {
        let l = loan(1, 0, 0);
        assert!(l.involves(&Address::new("aleo1lender")));
        assert!(l.involves(&Address::new("aleo1owner")));
        assert!(!l.involves(&Address::new("aleo1stranger")));
    }

    #[test]
    fn collateral_release_window() {
        let c = Collateral {
            owner: Address::new("aleo1abc"),
            loan_id: "1".into(),
            amount: 10,
            token_type: 0,
            lock_time: 0,
            release_time: 100,
            is_active: true,
            record: Arc::new(RawRecord::new("Collateral")),
        };
        assert!(!c.is_releasable(datetime_from_secs(99)));
        assert!(c.is_releasable(datetime_from_secs(100)));

        let released = Collateral { is_active: false, ..c };
        assert!(!released.is_releasable(datetime_from_secs(1_000)));
    }

    #[test]
    fn out_of_range_timestamps_fall_back_to_epoch() {
        assert_eq!(datetime_from_secs(u64::MAX).timestamp(), 0);
        assert_eq!(datetime_from_secs(1_000_000).timestamp(), 1_000_000);
    }

    #[test]
    fn empty_state() {
        assert!(ProjectedState::default().is_empty());
    }
}
