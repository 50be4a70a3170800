use lending_types::{Collateral, CreditCredential, Loan, ProjectedState};
use tracing::{debug, warn};

use crate::error::ProjectionError;

/// Credential and collateral chosen to satisfy a credit-gated loan offer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GateSelection<'a> {
    pub credential: &'a CreditCredential,
    pub collateral: &'a Collateral,
}

/// Pick the inputs for accepting a credit-gated offer.
///
/// Takes the first credential whose `min_score` does not exceed the loan's
/// `min_credit_score`, and the first active collateral holding at least the
/// loan's `collateral_amount`. Selection is first-match in supplied order,
/// not best-match.
pub fn select_credit_gate<'a>(
    loan: &Loan,
    credentials: &'a [CreditCredential],
    collateral: &'a [Collateral],
) -> Result<GateSelection<'a>, ProjectionError> {
    let credential = credentials
        .iter()
        .find(|c| c.satisfies(loan.min_credit_score))
        .ok_or_else(|| {
            warn!(
                loan = %loan.id,
                required = loan.min_credit_score,
                available = credentials.len(),
                "No credit credential satisfies loan gate"
            );
            ProjectionError::NoQualifyingCredential {
                required: loan.min_credit_score,
            }
        })?;

    let collateral = collateral
        .iter()
        .find(|c| c.is_active && c.amount >= loan.collateral_amount)
        .ok_or_else(|| {
            warn!(
                loan = %loan.id,
                required = loan.collateral_amount,
                "No active collateral covers loan gate"
            );
            ProjectionError::NoQualifyingCollateral {
                required: loan.collateral_amount,
            }
        })?;

    debug!(
        loan = %loan.id,
        credential_min_score = credential.min_score,
        collateral_amount = collateral.amount,
        "Credit gate satisfied"
    );
    Ok(GateSelection {
        credential,
        collateral,
    })
}

/// [`select_credit_gate`] over a projected state's credentials and collateral.
pub fn credit_gate_for<'a>(
    state: &'a ProjectedState,
    loan: &Loan,
) -> Result<GateSelection<'a>, ProjectionError> {
    select_credit_gate(loan, &state.credit_proofs, &state.collateral)
}
