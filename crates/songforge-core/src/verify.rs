//! Installation verification report types.
//!
//! The probes themselves live in `songforge-engine` (they touch binaries and
//! the filesystem); these are the plain-data results that both the CLI table
//! and the GUI render.

use serde::{Deserialize, Serialize};

/// Outcome of a single verification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// One verification check with its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Human-readable check name (e.g. "Engine binary").
    pub name: String,
    pub status: CheckStatus,
    /// Detail line: version found, path checked, or how to fix.
    pub detail: String,
    /// Critical checks gate the "installation OK" verdict; non-critical
    /// ones only warn.
    pub critical: bool,
}

impl CheckOutcome {
    pub fn pass(name: impl Into<String>, detail: impl Into<String>, critical: bool) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            detail: detail.into(),
            critical,
        }
    }

    pub fn warn(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warn,
            detail: detail.into(),
            critical: false,
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>, critical: bool) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            detail: detail.into(),
            critical,
        }
    }
}

/// Full installation verification report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyReport {
    pub checks: Vec<CheckOutcome>,
}

impl VerifyReport {
    /// Whether every critical check passed.
    #[must_use]
    pub fn critical_ok(&self) -> bool {
        self.checks
            .iter()
            .filter(|c| c.critical)
            .all(|c| c.status == CheckStatus::Pass)
    }

    /// Count of critical checks that passed.
    #[must_use]
    pub fn critical_passed(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.critical && c.status == CheckStatus::Pass)
            .count()
    }

    /// Total number of critical checks.
    #[must_use]
    pub fn critical_total(&self) -> usize {
        self.checks.iter().filter(|c| c.critical).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_verdict() {
        let report = VerifyReport {
            checks: vec![
                CheckOutcome::pass("Engine binary", "/usr/bin/engine", true),
                CheckOutcome::warn("Model files", "not downloaded yet"),
                CheckOutcome::fail("Output folder", "not writable", true),
            ],
        };
        assert!(!report.critical_ok());
        assert_eq!(report.critical_passed(), 1);
        assert_eq!(report.critical_total(), 2);
    }

    #[test]
    fn test_warnings_do_not_gate() {
        let report = VerifyReport {
            checks: vec![
                CheckOutcome::pass("Engine binary", "ok", true),
                CheckOutcome::warn("CUDA", "toolkit missing"),
            ],
        };
        assert!(report.critical_ok());
    }
}
