use thiserror::Error;

/// Errors from queries over a projected state.
///
/// Projection itself never fails; these are precondition failures raised
/// when a dependent action looks for something the state does not contain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("no credit credential satisfies the required minimum score {required}")]
    NoQualifyingCredential { required: u32 },

    #[error("no active collateral covers the required amount {required}")]
    NoQualifyingCollateral { required: u64 },

    #[error("loan not found in projected state: {0}")]
    LoanNotFound(String),
}
