use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/records.json");

fn lendctl() -> Command {
    let mut cmd = Command::cargo_bin("lendctl").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("LENDCTL_CONFIG")
        .env_remove("LENDCTL_IDENTITY")
        .env_remove("RUST_LOG")
        .args(["--records", FIXTURE, "--at", "1700000000"]);
    cmd
}

#[test]
fn summary_reports_profile_and_dashboard() {
    lendctl()
        .args(["--identity", "aleo1abc", "--output", "json", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"credit_score\": 742"))
        .stdout(predicate::str::contains("\"rating\": \"Good\""))
        .stdout(predicate::str::contains("\"active_loans\": 1"))
        .stdout(predicate::str::contains("\"available_offers\": 2"));
}

#[test]
fn summary_requires_identity() {
    lendctl()
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--identity"));
}

#[test]
fn loan_filters_select_rows() {
    lendctl()
        .args(["--identity", "aleo1abc", "loans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loan-active"))
        .stdout(predicate::str::contains("offer-gated").not());

    lendctl()
        .args(["--identity", "aleo1abc", "loans", "--filter", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("payment"))
        .stdout(predicate::str::contains("loan-active").not());
}

#[test]
fn offers_include_private_and_public() {
    lendctl()
        .args(["--identity", "aleo1abc", "--output", "json", "offers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("offer-gated"))
        .stdout(predicate::str::contains("public-offer"));
}

#[test]
fn offers_mine_lists_lender_side() {
    lendctl()
        .args(["--identity", "aleo1abc", "offers", "--mine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-offer"))
        .stdout(predicate::str::contains("300,000 A"))
        .stdout(predicate::str::contains("offer-gated").not());

    lendctl()
        .args(["--identity", "aleo1abc", "offers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-offer").not());
}

#[test]
fn gate_check_reports_selection() {
    lendctl()
        .args(["--identity", "aleo1abc", "gate", "offer-gated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("can be accepted"))
        .stdout(predicate::str::contains("min score 600"));

    lendctl()
        .args(["--identity", "aleo1abc", "gate", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn dry_run_repay_builds_credit_update() {
    lendctl()
        .args([
            "--identity",
            "aleo1abc",
            "dry-run",
            "repay",
            "loan-active",
            "5000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"functionName\": \"pay_with_credit_update\""))
        .stdout(predicate::str::contains("5000u64"))
        .stdout(predicate::str::contains("1700000000u64"));
}

#[test]
fn dry_run_rejects_out_of_range_extension() {
    lendctl()
        .args([
            "--identity",
            "aleo1abc",
            "dry-run",
            "extend",
            "loan-active",
            "31",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("extra_days"));
}

#[test]
fn bare_array_from_stdin() {
    let mut cmd = Command::cargo_bin("lendctl").unwrap();
    cmd.env("NO_COLOR", "1")
        .args(["--records", "-", "--identity", "aleo1abc", "state"])
        .write_stdin(
            r#"[{"recordName":"Collateral","data":{"owner":"aleo1abc.private","amount":"10u64.private"}}]"#,
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amount\": 10"));
}

#[test]
fn config_needs_no_records() {
    let mut cmd = Command::cargo_bin("lendctl").unwrap();
    cmd.env_remove("LENDCTL_CONFIG")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("private_lending_credit_complete.aleo"));
}
