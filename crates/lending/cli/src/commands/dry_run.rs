//! Build transactions against a record dump without broadcasting them

use anyhow::{Context as _, Result};
use clap::Subcommand;
use lending_client::mocks::MockWallet;
use lending_client::{FixedClock, LendingClient, LoanTerms};
use lending_projection::{find_loan, find_offer};

use super::Context;
use crate::output::print_single;

/// Dry-run subcommands
#[derive(Subcommand)]
pub enum DryRunCommands {
    /// Repay a loan, updating the credit profile when one exists
    Repay {
        /// Loan record ID
        loan_id: String,
        /// Amount in record units
        amount: u64,
    },

    /// Accept a private loan offer
    Borrow {
        /// Offer record ID
        offer_id: String,
    },

    /// Accept a credit-gated offer with the first qualifying credential and collateral
    AcceptWithCredit {
        /// Offer record ID
        offer_id: String,
    },

    /// Extend a loan by 1 to 30 days
    Extend {
        /// Loan record ID
        loan_id: String,
        days: u64,
    },

    /// Offer a private loan to a borrower
    Lend {
        borrower: String,
        /// Amount in record units
        amount: u64,
        /// Interest in basis points
        interest: u32,
        /// Duration in days
        days: u64,
    },
}

/// Run the action through an in-memory wallet and print the request it would sign.
pub async fn execute(command: DryRunCommands, ctx: &Context) -> Result<()> {
    let identity = ctx.require_identity()?;
    let wallet = MockWallet::new(identity.as_str()).with_records(ctx.records.clone());
    let mut client = LendingClient::with_clock(ctx.config.clone(), wallet, FixedClock(ctx.now));
    client.connect().await?;
    client.fetch_records().await?;

    match command {
        DryRunCommands::Repay { loan_id, amount } => {
            let loan = find_loan(client.state(), &loan_id)?.clone();
            client.repay(&loan, amount).await?;
        }
        DryRunCommands::Borrow { offer_id } => {
            let offer = find_offer(client.state(), &offer_id)?.clone();
            client.borrow(&offer).await?;
        }
        DryRunCommands::AcceptWithCredit { offer_id } => {
            let offer = find_offer(client.state(), &offer_id)?.clone();
            client.accept_loan_with_credit(&offer).await?;
        }
        DryRunCommands::Extend { loan_id, days } => {
            let loan = find_loan(client.state(), &loan_id)?.clone();
            client.extend(&loan, days).await?;
        }
        DryRunCommands::Lend {
            borrower,
            amount,
            interest,
            days,
        } => {
            let terms = LoanTerms {
                amount,
                interest,
                duration_days: days,
            };
            client.lend(&borrower, &terms).await?;
        }
    }

    let request = client
        .wallet()
        .submitted()
        .pop()
        .context("no transaction was built")?;
    print_single(&request)
}
