//! Read models derived from a [`ProjectedState`] for dashboards and tables.

use lending_types::{Address, Loan, LoanKind, ProjectedState};
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Headline figures for the connected identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Active loans (active flag set, kind `ActiveLoan`) the identity is party to
    pub active_loans: usize,
    /// Principal of every loan record where the identity is lender
    pub total_lent: u64,
    /// Principal of every loan record where the identity is borrower
    pub total_borrowed: u64,
    /// Outstanding principal plus interest on the identity's active borrowings
    pub pending_repayment: u64,
}

impl DashboardSummary {
    pub fn compute(state: &ProjectedState, identity: &Address) -> Self {
        let mut summary = Self::default();
        for loan in &state.loans {
            if is_active_loan(loan) {
                summary.active_loans += 1;
            }
            if loan.lender == *identity {
                summary.total_lent = summary.total_lent.saturating_add(loan.amount);
            }
            if loan.borrower == *identity {
                summary.total_borrowed = summary.total_borrowed.saturating_add(loan.amount);
                if is_active_loan(loan) {
                    summary.pending_repayment =
                        summary.pending_repayment.saturating_add(loan.remaining());
                }
            }
        }
        summary
    }
}

/// Tabs of the "my loans" table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanFilter {
    All,
    #[default]
    Active,
    /// Payment proofs, claimed payments and fee records
    Pending,
    Completed,
    Overdue,
}

impl LoanFilter {
    pub fn matches(self, loan: &Loan) -> bool {
        match self {
            LoanFilter::All => true,
            LoanFilter::Active => is_active_loan(loan),
            LoanFilter::Pending => loan.kind.is_payment_record(),
            LoanFilter::Completed => !loan.active || loan.kind == LoanKind::CompletedLoan,
            LoanFilter::Overdue => loan.overdue && loan.active,
        }
    }
}

impl std::str::FromStr for LoanFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(LoanFilter::All),
            "active" => Ok(LoanFilter::Active),
            "pending" => Ok(LoanFilter::Pending),
            "completed" => Ok(LoanFilter::Completed),
            "overdue" => Ok(LoanFilter::Overdue),
            other => Err(format!("unknown loan filter: {other}")),
        }
    }
}

/// Loans where `identity` is borrower or lender, excluding offers, narrowed by `filter`.
pub fn my_loans<'a>(
    state: &'a ProjectedState,
    identity: &Address,
    filter: LoanFilter,
) -> Vec<&'a Loan> {
    state
        .loans
        .iter()
        .filter(|loan| loan.borrower == *identity || loan.lender == *identity)
        .filter(|loan| !loan.kind.is_offer())
        .filter(|loan| filter.matches(loan))
        .collect()
}

/// Offers `identity` could accept.
///
/// Private offers addressed to the identity (or to nobody) that the lender
/// still holds, followed by public offers still held by a lender other than
/// the identity.
pub fn available_offers<'a>(state: &'a ProjectedState, identity: &Address) -> Vec<&'a Loan> {
    let private = state
        .loan_offers
        .iter()
        .filter(|offer| offer.borrower == *identity || offer.borrower.is_empty())
        .filter(|offer| offer.owner == offer.lender);
    let public = state
        .public_offers
        .iter()
        .filter(|offer| offer.owner == offer.lender && offer.lender != *identity);
    private.chain(public).collect()
}

/// Offers `identity` created as lender: private offers followed by public ones.
///
/// These are the offers the lender can still send, reprice or cancel.
pub fn my_offers<'a>(state: &'a ProjectedState, identity: &Address) -> Vec<&'a Loan> {
    state
        .loan_offers
        .iter()
        .chain(state.public_offers.iter())
        .filter(|offer| offer.lender == *identity)
        .collect()
}

/// Payment proofs, claimed payments and fee records among the identity's loans.
pub fn payment_history(state: &ProjectedState) -> Vec<&Loan> {
    state
        .loans
        .iter()
        .filter(|loan| loan.kind.is_payment_record())
        .collect()
}

/// Active loans the identity is borrowing and can still repay, extend, split or swap.
pub fn repayable_loans<'a>(state: &'a ProjectedState, identity: &Address) -> Vec<&'a Loan> {
    state
        .loans
        .iter()
        .filter(|loan| loan.borrower == *identity && is_active_loan(loan))
        .collect()
}

/// Look a loan up by id among the identity's loans.
pub fn find_loan<'a>(state: &'a ProjectedState, id: &str) -> Result<&'a Loan, ProjectionError> {
    state
        .loans
        .iter()
        .find(|loan| loan.id == id)
        .ok_or_else(|| ProjectionError::LoanNotFound(id.to_string()))
}

/// Look an offer up by id among private and public offers.
pub fn find_offer<'a>(state: &'a ProjectedState, id: &str) -> Result<&'a Loan, ProjectionError> {
    state
        .loan_offers
        .iter()
        .chain(state.public_offers.iter())
        .find(|loan| loan.id == id)
        .ok_or_else(|| ProjectionError::LoanNotFound(id.to_string()))
}

fn is_active_loan(loan: &Loan) -> bool {
    loan.active && loan.kind == LoanKind::ActiveLoan
}
