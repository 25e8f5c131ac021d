//! Installation verification handler.
//!
//! Runs the probes and displays them in a formatted, user-friendly table.

use anyhow::Result;

use songforge_core::verify::{CheckOutcome, CheckStatus};
use songforge_engine::run_verification;

use crate::bootstrap::CliContext;

// ANSI color codes for better UX
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Execute the verify command.
///
/// Returns an error (non-zero exit) when any critical check fails.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    println!("{BOLD}{BLUE}Verifying songforge installation...{RESET}\n");

    let settings = ctx.settings.get().await?;
    let report = run_verification(&settings);

    println!("{BOLD}{:<28} {:<8} {:<50}{RESET}", "CHECK", "STATUS", "DETAIL");
    println!("{}", "=".repeat(86));

    for check in &report.checks {
        print_check(check);
    }

    println!("{}", "=".repeat(86));

    if report.critical_ok() {
        println!(
            "{GREEN}\u{2713} All critical checks passed!{RESET} ({}/{})",
            report.critical_passed(),
            report.critical_total()
        );
        println!("\n{BOLD}You can now launch the GUI or run: {BLUE}songforge generate{RESET}");
        Ok(())
    } else {
        println!(
            "{RED}\u{2717} Critical checks failed.{RESET} ({}/{})",
            report.critical_passed(),
            report.critical_total()
        );
        println!("\nFix the issues above, then run {BLUE}songforge verify{RESET} again.");
        anyhow::bail!("Installation verification failed")
    }
}

fn print_check(check: &CheckOutcome) {
    let (color, label) = match check.status {
        CheckStatus::Pass => (GREEN, "PASS"),
        CheckStatus::Warn => (YELLOW, "WARN"),
        CheckStatus::Fail => (RED, "FAIL"),
    };
    println!(
        "{:<28} {color}{label:<8}{RESET} {}",
        check.name, check.detail
    );
}
