use std::sync::Arc;

use lending_types::{Address, IntegerWidth, Literal, RawRecord, RecordError};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;

/// Execution fee attached to every lending transition.
pub const DEFAULT_FEE: u64 = 500_000;

/// Transitions of the lending program this client can invoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    RegisterUser,
    GenerateCreditProof,
    LockCollateral,
    ReleaseCollateral,
    CreateLoanOfferWithCredit,
    AcceptLoanWithCredit,
    PayWithCreditUpdate,
    Lend,
    SendOffer,
    Borrow,
    Pay,
    Extend,
    Split,
    Swap,
    ListOffer,
    AcceptPublicOffer,
    UpdateInterest,
    CancelOffer,
    RejectOffer,
}

impl Transition {
    pub const ALL: [Transition; 19] = [
        Transition::RegisterUser,
        Transition::GenerateCreditProof,
        Transition::LockCollateral,
        Transition::ReleaseCollateral,
        Transition::CreateLoanOfferWithCredit,
        Transition::AcceptLoanWithCredit,
        Transition::PayWithCreditUpdate,
        Transition::Lend,
        Transition::SendOffer,
        Transition::Borrow,
        Transition::Pay,
        Transition::Extend,
        Transition::Split,
        Transition::Swap,
        Transition::ListOffer,
        Transition::AcceptPublicOffer,
        Transition::UpdateInterest,
        Transition::CancelOffer,
        Transition::RejectOffer,
    ];

    /// Function name in the on-chain program.
    pub fn name(self) -> &'static str {
        match self {
            Transition::RegisterUser => "register_user",
            Transition::GenerateCreditProof => "generate_credit_proof",
            Transition::LockCollateral => "lock_collateral",
            Transition::ReleaseCollateral => "release_collateral",
            Transition::CreateLoanOfferWithCredit => "create_loan_offer_with_credit",
            Transition::AcceptLoanWithCredit => "accept_loan_with_credit",
            Transition::PayWithCreditUpdate => "pay_with_credit_update",
            Transition::Lend => "lend",
            Transition::SendOffer => "send_offer",
            Transition::Borrow => "borrow",
            Transition::Pay => "pay",
            Transition::Extend => "extend",
            Transition::Split => "split",
            Transition::Swap => "swap",
            Transition::ListOffer => "list_offer",
            Transition::AcceptPublicOffer => "accept_public_offer",
            Transition::UpdateInterest => "update_interest",
            Transition::CancelOffer => "cancel_offer",
            Transition::RejectOffer => "reject_offer",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed transition argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    U8(u8),
    U32(u32),
    U64(u64),
    /// Decimal digits of a field element
    Field(String),
    Address(Address),
    Bool(bool),
    /// A record consumed by the transition, passed as its full JSON
    Record(Arc<RawRecord>),
}

impl Argument {
    /// Wallet input form: `1000u64`, `5field`, `aleo1...`, `true`, or record JSON.
    pub fn to_input(&self) -> Result<String, RecordError> {
        let literal = match self {
            Argument::U8(v) => Literal::integer(IntegerWidth::U8, v),
            Argument::U32(v) => Literal::integer(IntegerWidth::U32, v),
            Argument::U64(v) => Literal::integer(IntegerWidth::U64, v),
            Argument::Field(v) => Literal::field(v.as_str()),
            Argument::Address(a) => Literal::address(a.as_str()),
            Argument::Bool(b) => Literal::boolean(*b),
            Argument::Record(record) => return record.to_input(),
        };
        Ok(literal.encode())
    }
}

/// One program call inside a transaction request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionCall {
    pub program: String,
    pub function_name: String,
    pub inputs: Vec<String>,
}

/// A transaction handed to the wallet for signing and broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Signer
    pub address: Address,
    pub chain_id: String,
    pub transitions: Vec<TransitionCall>,
    pub fee: u64,
    pub fee_private: bool,
}

impl TransactionRequest {
    /// The single call this client places in every request.
    pub fn transition(&self) -> Option<&TransitionCall> {
        self.transitions.first()
    }
}

/// Encodes a transition and its ordered arguments into a [`TransactionRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionBuilder {
    program: String,
    network: String,
    fee: u64,
}

impl TransactionBuilder {
    pub fn new(program: impl Into<String>, network: impl Into<String>, fee: u64) -> Self {
        Self {
            program: program.into(),
            network: network.into(),
            fee,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.program_id, &config.network, config.fee)
    }

    pub fn call(
        &self,
        signer: &Address,
        transition: Transition,
        args: &[Argument],
    ) -> Result<TransactionRequest, RecordError> {
        let inputs = args
            .iter()
            .map(Argument::to_input)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransactionRequest {
            address: signer.clone(),
            chain_id: self.network.clone(),
            transitions: vec![TransitionCall {
                program: self.program.clone(),
                function_name: transition.name().to_string(),
                inputs,
            }],
            fee: self.fee,
            fee_private: false,
        })
    }
}
