//! Read-only views over a projected record dump

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::*;
use lending_projection::{
    available_offers, credit_gate_for, find_offer, my_loans, my_offers, payment_history,
    DashboardSummary, LoanFilter,
};
use lending_types::{Collateral, CreditCredential, Loan};
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{
    amount, print_output, print_single, print_success, print_warning, short_address,
    OutputFormat,
};

#[derive(Tabled, Serialize)]
struct LoanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Lender")]
    lender: String,
    #[tabled(rename = "Borrower")]
    borrower: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl LoanRow {
    fn new(loan: &Loan, now: DateTime<Utc>) -> Self {
        let status = if !loan.active {
            "closed".to_string()
        } else if loan.overdue {
            "overdue".to_string()
        } else {
            format!("{}d left", loan.days_until_due(now))
        };
        Self {
            id: loan.id.clone(),
            kind: loan.kind.label().to_string(),
            lender: short_address(loan.lender.as_str()),
            borrower: short_address(loan.borrower.as_str()),
            amount: amount(loan.amount),
            interest: format!("{:.2}%", f64::from(loan.interest) / 100.0),
            remaining: amount(loan.remaining()),
            due: loan.due_date.format("%Y-%m-%d").to_string(),
            status,
        }
    }
}

#[derive(Tabled, Serialize)]
struct CollateralRow {
    #[tabled(rename = "Loan")]
    loan_id: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Token")]
    token_type: u8,
    #[tabled(rename = "Releases")]
    release: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl CollateralRow {
    fn new(collateral: &Collateral, now: DateTime<Utc>) -> Self {
        let status = if !collateral.is_active {
            "released"
        } else if collateral.is_releasable(now) {
            "releasable"
        } else {
            "locked"
        };
        Self {
            loan_id: collateral.loan_id.clone(),
            amount: amount(collateral.amount),
            token_type: collateral.token_type,
            release: lending_types::datetime_from_secs(collateral.release_time)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            status: status.to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct CredentialRow {
    #[tabled(rename = "Min score")]
    min_score: u32,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Valid for")]
    validity: String,
    #[tabled(rename = "Proof")]
    proof_hash: String,
}

impl From<&CreditCredential> for CredentialRow {
    fn from(credential: &CreditCredential) -> Self {
        Self {
            min_score: credential.min_score,
            issued: lending_types::datetime_from_secs(credential.issued_time)
                .format("%Y-%m-%d")
                .to_string(),
            validity: format!("{}d", credential.validity_period / 86_400),
            proof_hash: credential.proof_hash.clone(),
        }
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    identity: &'a str,
    credit_score: Option<u32>,
    rating: Option<&'static str>,
    success_rate_percent: Option<u32>,
    #[serde(flatten)]
    dashboard: DashboardSummary,
    available_offers: usize,
    credentials: usize,
}

pub fn summary(ctx: &Context) -> Result<()> {
    let identity = ctx.require_identity()?;
    let state = ctx.project();
    let profile = state.profile.as_ref();
    let summary = Summary {
        identity: identity.as_str(),
        credit_score: profile.map(|p| p.credit_score),
        rating: profile.map(|p| p.rating().label()),
        success_rate_percent: profile.map(|p| p.success_rate_percent()),
        dashboard: DashboardSummary::compute(&state, identity),
        available_offers: available_offers(&state, identity).len(),
        credentials: state.credit_proofs.len(),
    };

    if ctx.format == OutputFormat::Json {
        return print_single(&summary);
    }

    println!("Identity: {}", identity);
    match profile {
        Some(p) => println!(
            "Credit score: {} ({}), {}% repaid on time over {} loans",
            p.credit_score.to_string().bold(),
            p.rating().label(),
            p.success_rate_percent(),
            p.total_loans
        ),
        None => print_warning("No user profile found. Register first."),
    }
    println!("Active loans: {}", summary.dashboard.active_loans);
    println!("Total lent: {}", amount(summary.dashboard.total_lent));
    println!("Total borrowed: {}", amount(summary.dashboard.total_borrowed));
    println!(
        "Pending repayment: {}",
        amount(summary.dashboard.pending_repayment)
    );
    println!("Available offers: {}", summary.available_offers);
    println!("Credit proofs: {}", summary.credentials);
    Ok(())
}

pub fn loans(ctx: &Context, filter: LoanFilter) -> Result<()> {
    let identity = ctx.require_identity()?;
    let state = ctx.project();
    let rows = my_loans(&state, identity, filter)
        .into_iter()
        .map(|loan| LoanRow::new(loan, ctx.now))
        .collect();
    print_output(rows, ctx.format)
}

/// Offers the identity can accept, or with `mine` the ones it created as lender.
pub fn offers(ctx: &Context, mine: bool) -> Result<()> {
    let identity = ctx.require_identity()?;
    let state = ctx.project();
    let offers = if mine {
        my_offers(&state, identity)
    } else {
        available_offers(&state, identity)
    };
    let rows = offers
        .into_iter()
        .map(|loan| LoanRow::new(loan, ctx.now))
        .collect();
    print_output(rows, ctx.format)
}

pub fn payments(ctx: &Context) -> Result<()> {
    ctx.require_identity()?;
    let state = ctx.project();
    let rows = payment_history(&state)
        .into_iter()
        .map(|loan| LoanRow::new(loan, ctx.now))
        .collect();
    print_output(rows, ctx.format)
}

pub fn collateral(ctx: &Context) -> Result<()> {
    ctx.require_identity()?;
    let state = ctx.project();
    let rows = state
        .collateral
        .iter()
        .map(|c| CollateralRow::new(c, ctx.now))
        .collect();
    print_output(rows, ctx.format)
}

pub fn credentials(ctx: &Context) -> Result<()> {
    ctx.require_identity()?;
    let state = ctx.project();
    let rows = state.credit_proofs.iter().map(CredentialRow::from).collect();
    print_output(rows, ctx.format)
}

/// Report the credential and collateral that would satisfy a credit-gated offer.
pub fn gate(ctx: &Context, offer_id: &str) -> Result<()> {
    ctx.require_identity()?;
    let state = ctx.project();
    let offer = find_offer(&state, offer_id)?;
    let selection = credit_gate_for(&state, offer)?;

    if ctx.format == OutputFormat::Json {
        return print_single(&serde_json::json!({
            "offer": offer.id,
            "credential_min_score": selection.credential.min_score,
            "credential_proof": selection.credential.proof_hash,
            "collateral_amount": selection.collateral.amount,
            "collateral_loan": selection.collateral.loan_id,
        }));
    }

    print_success(&format!("Offer {} can be accepted", offer.id));
    println!(
        "  Credential: min score {} (offer requires {})",
        selection.credential.min_score, offer.min_credit_score
    );
    println!(
        "  Collateral: {} locked for loan {} (offer requires {})",
        amount(selection.collateral.amount),
        selection.collateral.loan_id,
        amount(offer.collateral_amount)
    );
    Ok(())
}

/// Dump the full projected state as JSON.
pub fn state(ctx: &Context) -> Result<()> {
    print_single(&ctx.project())
}
