//! Integration tests for the verification report types.
//!
//! The probes themselves live in the engine crate and need real binaries;
//! these tests cover the report contract the CLI table and GUI render.

use songforge_core::verify::{CheckOutcome, CheckStatus, VerifyReport};

#[test]
fn test_check_outcome_constructors() {
    let pass = CheckOutcome::pass("Engine binary", "/usr/local/bin/songgen", true);
    let warn = CheckOutcome::warn("Checkpoints", "not downloaded yet");
    let fail = CheckOutcome::fail("Output folder", "not writable", true);

    assert_eq!(pass.status, CheckStatus::Pass);
    assert!(pass.critical);
    assert_eq!(warn.status, CheckStatus::Warn);
    assert!(!warn.critical);
    assert_eq!(fail.status, CheckStatus::Fail);
}

#[test]
fn test_empty_report_is_vacuously_ok() {
    let report = VerifyReport::default();
    assert!(report.critical_ok());
    assert_eq!(report.critical_total(), 0);
}

#[test]
fn test_report_serializes_for_the_gui() {
    let report = VerifyReport {
        checks: vec![
            CheckOutcome::pass("Engine binary", "ok", true),
            CheckOutcome::warn("CUDA", "toolkit missing"),
        ],
    };

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"status\":\"pass\""));
    assert!(json.contains("\"status\":\"warn\""));
    assert!(json.contains("\"critical\":true"));

    let back: VerifyReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.checks.len(), 2);
    assert!(back.critical_ok());
}
