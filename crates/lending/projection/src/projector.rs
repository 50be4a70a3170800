use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lending_types::{
    clean, datetime_from_secs, unix_secs, Address, Collateral, CreditCredential, Loan, LoanKind,
    OfferRouting, Profile, ProjectedState, RawRecord, RecordType, DEFAULT_CREDIT_SCORE,
};
use tracing::{debug, trace};
use uuid::Uuid;

/// Project a batch of decrypted records into the local state, using the wall clock
/// for the `overdue` flag.
///
/// See [`project_at`].
pub fn project(identity: Option<&Address>, records: &[RawRecord]) -> ProjectedState {
    project_at(identity, records, Utc::now())
}

/// Project a batch of decrypted records into the local state as of `now`.
///
/// Every call builds a fresh state; nothing carries over from earlier
/// projections. Records are classified by `recordName`, unknown names are
/// skipped. Profiles, collateral and credentials are kept only when owned by
/// `identity`; loans when `identity` is lender, borrower or owner. Loan
/// offers are routed by discriminant regardless of ownership. Output order
/// follows input order and duplicates are kept.
///
/// Never fails: unreadable fields fall back to their defaults.
pub fn project_at(
    identity: Option<&Address>,
    records: &[RawRecord],
    now: DateTime<Utc>,
) -> ProjectedState {
    let identity = identity.filter(|id| !id.is_empty());
    let mut state = ProjectedState::default();
    let mut ignored = 0usize;

    for record in records {
        let Some(record_type) = record.record_type() else {
            trace!(record_name = %record.record_name, "Ignoring unrecognized record type");
            ignored += 1;
            continue;
        };

        match record_type {
            RecordType::UserProfile => {
                let profile = read_profile(record);
                if identity == Some(&profile.owner) {
                    state.profile = Some(profile);
                }
            }
            RecordType::Loan => {
                let loan = read_loan(record, now);
                match loan.kind.routing() {
                    OfferRouting::PrivateOffers => state.loan_offers.push(loan.clone()),
                    OfferRouting::PublicOffers => state.public_offers.push(loan.clone()),
                    OfferRouting::None => {}
                }
                if identity.is_some_and(|id| loan.involves(id)) {
                    state.loans.push(loan);
                }
            }
            RecordType::Collateral => {
                let collateral = read_collateral(record);
                if identity == Some(&collateral.owner) {
                    state.collateral.push(collateral);
                }
            }
            RecordType::CreditCredential => {
                let credential = read_credential(record);
                if identity == Some(&credential.owner) {
                    state.credit_proofs.push(credential);
                }
            }
        }
    }

    debug!(
        identity = identity.map(Address::as_str).unwrap_or("<none>"),
        records = records.len(),
        ignored,
        has_profile = state.profile.is_some(),
        loans = state.loans.len(),
        loan_offers = state.loan_offers.len(),
        public_offers = state.public_offers.len(),
        collateral = state.collateral.len(),
        credit_proofs = state.credit_proofs.len(),
        "Projected record batch"
    );

    state
}

fn read_profile(record: &RawRecord) -> Profile {
    let fields = Fields(record);
    Profile {
        owner: fields.address("owner"),
        user_id: fields.text("user_id", "0"),
        credit_score: fields.number("credit_score", DEFAULT_CREDIT_SCORE),
        total_loans: fields.number("total_loans", 0),
        successful_repayments: fields.number("successful_repayments", 0),
        defaults: fields.number("defaults", 0),
        total_borrowed: fields.number("total_borrowed", 0),
        total_repaid: fields.number("total_repaid", 0),
        registration_time: fields.number("registration_time", 0),
        last_update_time: fields.number("last_update_time", 0),
        record: Arc::new(record.clone()),
    }
}

fn read_loan(record: &RawRecord, now: DateTime<Utc>) -> Loan {
    let fields = Fields(record);
    let created: u64 = fields.number("created", 0);
    let due_time: u64 = fields.number("due_time", 0);
    let due_date = datetime_from_secs(due_time);

    Loan {
        id: loan_id(record),
        record: Arc::new(record.clone()),
        owner: fields.address("owner"),
        lender: fields.address("lender"),
        borrower: fields.address("borrower"),
        amount: fields.number("amount", 0),
        interest: fields.number("interest", 0),
        repaid: fields.number("repaid", 0),
        created,
        due_time,
        created_date: datetime_from_secs(created),
        due_date,
        active: fields.flag("active", false),
        kind: LoanKind::from_discriminant(fields.number::<i64>("loan_type", 0)),
        // Raw seconds: due times past the calendar range are never overdue
        overdue: unix_secs(now) > due_time,
        min_credit_score: fields.number("min_credit_score", 0),
        collateral_amount: fields.number("collateral_amount", 0),
        collateral_ratio: fields.number("collateral_ratio", 0),
        has_collateral: fields.flag("has_collateral", false),
    }
}

fn read_collateral(record: &RawRecord) -> Collateral {
    let fields = Fields(record);
    Collateral {
        owner: fields.address("owner"),
        loan_id: fields.text("loan_id", "0"),
        amount: fields.number("amount", 0),
        token_type: fields.number("token_type", 0),
        lock_time: fields.number("lock_time", 0),
        release_time: fields.number("release_time", 0),
        is_active: fields.flag("is_active", true),
        record: Arc::new(record.clone()),
    }
}

fn read_credential(record: &RawRecord) -> CreditCredential {
    let fields = Fields(record);
    CreditCredential {
        owner: fields.address("owner"),
        min_score: fields.number("min_score", 0),
        proof_hash: fields.text("proof_hash", "0"),
        validity_period: fields.number("validity_period", 0),
        issued_time: fields.number("issued_time", 0),
        nullifier: fields.text("nullifier", "0"),
        record: Arc::new(record.clone()),
    }
}

/// Wallet record id, or a stable id derived from the record contents so that
/// projecting the same batch twice yields equal loans.
fn loan_id(record: &RawRecord) -> String {
    match record.id() {
        Some(id) => id.to_string(),
        None => {
            let bytes = serde_json::to_vec(record).unwrap_or_default();
            format!("loan_{}", Uuid::new_v5(&Uuid::NAMESPACE_OID, &bytes).simple())
        }
    }
}

/// Field access with per-field defaults.
struct Fields<'a>(&'a RawRecord);

impl Fields<'_> {
    fn raw(&self, name: &str) -> Option<Cow<'_, str>> {
        self.0.field_text(name)
    }

    fn text(&self, name: &str, default: &str) -> String {
        match self.raw(name) {
            Some(value) => clean(&value).to_string(),
            None => default.to_string(),
        }
    }

    fn address(&self, name: &str) -> Address {
        Address::new(self.text(name, ""))
    }

    fn number<T: std::str::FromStr>(&self, name: &str, default: T) -> T {
        self.raw(name)
            .and_then(|value| clean(&value).parse().ok())
            .unwrap_or(default)
    }

    /// A present field is true only if it cleans to `"true"`.
    fn flag(&self, name: &str, default: bool) -> bool {
        match self.raw(name) {
            Some(value) => clean(&value) == "true",
            None => default,
        }
    }
}
