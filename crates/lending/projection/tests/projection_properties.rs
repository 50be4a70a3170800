use chrono::{DateTime, Utc};
use lending_projection::{credit_gate_for, project_at};
use lending_types::{datetime_from_secs, Address, LoanKind, RawRecord};
use proptest::prelude::*;

const ME: &str = "aleo1abc";

fn me() -> Address {
    Address::new(ME)
}

fn now() -> DateTime<Utc> {
    datetime_from_secs(1_700_000_000)
}

fn address() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ME.to_string()),
        Just("aleo1xyz".to_string()),
        Just("aleo1bank".to_string()),
    ]
}

/// On-chain discriminants plus values that do not fit in a `u8`.
fn loan_type() -> impl Strategy<Value = i64> {
    prop_oneof![
        4 => 0i64..=9,
        1 => 256i64..=u16::MAX as i64,
        1 => -128i64..0,
    ]
}

fn loan_record() -> impl Strategy<Value = RawRecord> {
    (address(), address(), address(), loan_type(), any::<u64>(), any::<bool>()).prop_map(
        |(owner, lender, borrower, loan_type, amount, active)| {
            RawRecord::new("Loan")
                .with_field("owner", format!("{owner}.private"))
                .with_field("lender", format!("{lender}.private"))
                .with_field("borrower", format!("{borrower}.private"))
                .with_field("loan_type", format!("{loan_type}i32.private"))
                .with_field("amount", format!("{amount}u64.private"))
                .with_field("active", format!("{active}.private"))
        },
    )
}

fn owned_record() -> impl Strategy<Value = RawRecord> {
    (
        prop_oneof![
            Just("UserProfile"),
            Just("Collateral"),
            Just("CreditCredential"),
        ],
        address(),
    )
        .prop_map(|(name, owner)| {
            RawRecord::new(name).with_field("owner", format!("{owner}.private"))
        })
}

fn unknown_record() -> impl Strategy<Value = RawRecord> {
    ("[A-Z][a-zA-Z]{0,12}", address()).prop_filter_map("known record name", |(name, owner)| {
        let known = ["UserProfile", "Loan", "Collateral", "CreditCredential"];
        (!known.contains(&name.as_str())).then(|| {
            RawRecord::new(name)
                .with_field("owner", format!("{owner}.private"))
                .with_field("loan_type", "0u8.private")
        })
    })
}

fn any_record() -> impl Strategy<Value = RawRecord> {
    prop_oneof![loan_record(), owned_record(), unknown_record()]
}

proptest! {
    #[test]
    fn unrecognized_records_change_nothing(
        records in proptest::collection::vec(any_record(), 0..12),
        extra in proptest::collection::vec(unknown_record(), 1..4),
        position in any::<prop::sample::Index>(),
    ) {
        let baseline = project_at(Some(&me()), &records, now());

        let mut mixed = records.clone();
        for record in extra {
            let at = position.index(mixed.len() + 1);
            mixed.insert(at, record);
        }
        prop_assert_eq!(project_at(Some(&me()), &mixed, now()), baseline);
    }

    #[test]
    fn offers_route_by_discriminant(record in loan_record()) {
        let state = project_at(Some(&me()), std::slice::from_ref(&record), now());
        let anonymous = project_at(None, std::slice::from_ref(&record), now());
        // Routing holds with and without an identity.
        for s in [&state, &anonymous] {
            let discriminant = record.field_text("loan_type").unwrap();
            match lending_types::clean(&discriminant).parse::<i64>().unwrap() {
                0 => {
                    prop_assert_eq!(s.loan_offers.len(), 1);
                    prop_assert!(s.public_offers.is_empty());
                }
                7 => {
                    prop_assert!(s.loan_offers.is_empty());
                    prop_assert_eq!(s.public_offers.len(), 1);
                }
                _ => {
                    prop_assert!(s.loan_offers.is_empty());
                    prop_assert!(s.public_offers.is_empty());
                }
            }
        }
    }

    #[test]
    fn loans_visible_iff_identity_is_a_party(record in loan_record()) {
        let state = project_at(Some(&me()), std::slice::from_ref(&record), now());
        let party = ["owner", "lender", "borrower"].iter().any(|f| {
            lending_types::clean(&record.field_text(f).unwrap()) == ME
        });
        prop_assert_eq!(state.loans.len(), usize::from(party));
    }

    #[test]
    fn owned_records_visible_iff_owner_matches(record in owned_record()) {
        let state = project_at(Some(&me()), std::slice::from_ref(&record), now());
        let mine = lending_types::clean(&record.field_text("owner").unwrap()) == ME;
        let visible = state.profile.is_some()
            || !state.collateral.is_empty()
            || !state.credit_proofs.is_empty();
        prop_assert_eq!(visible, mine);
    }

    #[test]
    fn projection_is_idempotent(records in proptest::collection::vec(any_record(), 0..16)) {
        let first = project_at(Some(&me()), &records, now());
        let second = project_at(Some(&me()), &records, now());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn order_is_preserved_and_duplicates_kept(
        records in proptest::collection::vec(loan_record(), 1..8),
    ) {
        let mut doubled = records.clone();
        doubled.extend(records.iter().cloned());
        let once = project_at(Some(&me()), &records, now());
        let twice = project_at(Some(&me()), &doubled, now());

        prop_assert_eq!(twice.loans.len(), once.loans.len() * 2);
        prop_assert_eq!(&twice.loans[..once.loans.len()], &once.loans[..]);
        prop_assert_eq!(&twice.loans[once.loans.len()..], &once.loans[..]);
    }
}

#[test]
fn lender_match_scenario() {
    let record = RawRecord::new("Loan")
        .with_field("owner", "aleo1abc.private")
        .with_field("lender", "aleo1abc.private")
        .with_field("borrower", "aleo1xyz.private")
        .with_field("amount", "1000u64.private")
        .with_field("interest", "500u32.private")
        .with_field("loan_type", "1u8.private")
        .with_field("due_time", "1000000u64.private")
        .with_field("active", "true.private");

    let state = project_at(Some(&me()), &[record], now());
    assert_eq!(state.loans.len(), 1);
    let loan = &state.loans[0];
    assert_eq!(loan.amount, 1000);
    assert_eq!(loan.interest, 500);
    assert!(loan.active);
    assert_eq!(loan.kind, LoanKind::ActiveLoan);
    assert_eq!(loan.kind.discriminant(), 1);
    assert!(state.loan_offers.is_empty());
    assert!(state.public_offers.is_empty());
}

#[test]
fn profile_without_credit_score_scenario() {
    let record = RawRecord::new("UserProfile").with_field("owner", "aleo1abc.private");
    let state = project_at(Some(&me()), &[record], now());
    assert_eq!(state.profile.unwrap().credit_score, 500);
}

#[test]
fn first_matching_credential_scenario() {
    let offer = RawRecord::new("Loan")
        .with_field("owner", "aleo1bank.private")
        .with_field("lender", "aleo1bank.private")
        .with_field("borrower", "aleo1abc.private")
        .with_field("loan_type", "0u8.private")
        .with_field("min_credit_score", "650u32.private")
        .with_field("collateral_amount", "100u64.private");
    let credential = |score: u32| {
        RawRecord::new("CreditCredential")
            .with_field("owner", "aleo1abc.private")
            .with_field("min_score", format!("{score}u32.private"))
    };
    let collateral = RawRecord::new("Collateral")
        .with_field("owner", "aleo1abc.private")
        .with_field("amount", "100u64.private");

    let state = project_at(
        Some(&me()),
        &[offer, credential(600), credential(700), collateral],
        now(),
    );
    let selection = credit_gate_for(&state, &state.loan_offers[0]).unwrap();
    assert_eq!(selection.credential.min_score, 600);
    assert_eq!(selection.collateral.amount, 100);
}

#[test]
fn wallet_batch_json_projects_end_to_end() {
    let json = r#"{
        "records": [
            {
                "id": "r1",
                "recordName": "UserProfile",
                "spent": false,
                "data": {
                    "owner": "aleo1abc.private",
                    "user_id": "991field.private",
                    "credit_score": "742u32.private",
                    "total_loans": "3u32.private",
                    "successful_repayments": "2u32.private"
                }
            },
            {
                "id": "r2",
                "recordName": "Token",
                "data": { "owner": "aleo1abc.private" }
            }
        ]
    }"#;
    let batch = lending_types::RecordBatch::from_json(json).unwrap();
    let state = project_at(Some(&me()), &batch.records, now());

    let profile = state.profile.unwrap();
    assert_eq!(profile.user_id, "991");
    assert_eq!(profile.credit_score, 742);
    assert_eq!(profile.success_rate_percent(), 67);
    assert_eq!(profile.rating(), lending_types::CreditRating::Good);
    assert_eq!(profile.record.id(), Some("r1"));
}
