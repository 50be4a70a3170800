//! # lending-types
//!
//! Record model for the private lending client:
//!
//! - **Tagged literals**: the wallet renders every record field as a value
//!   followed by a type and visibility suffix (`1000u64.private`,
//!   `aleo1....private`, `true.private`). [`Literal`] parses and re-encodes
//!   that scheme.
//! - **Raw records**: [`RawRecord`] is the decrypted record envelope. It is
//!   kept byte-for-byte so it can be resubmitted as a transition input.
//! - **Projected entities**: [`Profile`], [`Loan`], [`Collateral`] and
//!   [`CreditCredential`], gathered in a [`ProjectedState`].

pub mod error;
pub mod literal;
pub mod record;
pub mod types;

pub use error::RecordError;
pub use literal::{clean, IntegerWidth, Literal, LiteralKind, Visibility};
pub use record::{RawRecord, RecordBatch, RecordType};
pub use types::{
    datetime_from_secs, unix_secs, Address, Collateral, CreditCredential, CreditRating, Loan,
    LoanKind, OfferRouting, Profile, ProjectedState, DEFAULT_CREDIT_SCORE, INTEREST_SCALE,
};
