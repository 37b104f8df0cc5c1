// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keybound doctor` command implementation.
//!
//! Walks the same path as a runtime load (identity, locate, parse, decrypt)
//! and reports each step, so an operator can see which one breaks. Settings
//! are already loaded and validated before any command runs.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use keybound_core::{CredentialState, KeyboundError, MachineIdentity};
use keybound_vault::{CredentialWorkflow, store};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `keybound doctor` command.
///
/// With `plain`, disables colored output.
pub fn run_doctor<I: MachineIdentity>(workflow: &CredentialWorkflow<I>, plain: bool) {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = collect_checks(workflow);

    println!();
    println!("  keybound doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", format_line(result, use_color));
    }

    println!();
    let issues = results.iter().filter(|r| r.status != CheckStatus::Pass).count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();
}

/// Every check, in the order a load performs them.
pub fn collect_checks<I: MachineIdentity>(workflow: &CredentialWorkflow<I>) -> Vec<CheckResult> {
    vec![
        check_identity(workflow.identity()),
        check_file(workflow),
        check_decrypt(workflow),
    ]
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    let (symbol, tag, message) = match result.status {
        CheckStatus::Pass => ("✓".green().to_string(), "[OK]  ", result.message.normal()),
        CheckStatus::Warn => ("!".yellow().to_string(), "[WARN]", result.message.yellow()),
        CheckStatus::Fail => ("✗".red().to_string(), "[FAIL]", result.message.red()),
    };

    if use_color {
        format!("    {symbol} {:<16} {message} ({duration_ms}ms)", result.name)
    } else {
        format!("    {tag} {:<16} {} ({duration_ms}ms)", result.name, result.message)
    }
}

/// The identity value itself is never shown.
fn check_identity(identity: &dyn MachineIdentity) -> CheckResult {
    let start = Instant::now();
    match identity.identity() {
        Ok(_) => CheckResult::new("Machine identity", CheckStatus::Pass, "available", start),
        Err(e) => CheckResult::new("Machine identity", CheckStatus::Fail, e.to_string(), start),
    }
}

fn check_file<I: MachineIdentity>(workflow: &CredentialWorkflow<I>) -> CheckResult {
    let start = Instant::now();
    let path = match workflow.locator().locate() {
        Ok(path) => path,
        Err(e) => return CheckResult::new("Credential file", CheckStatus::Fail, e.to_string(), start),
    };
    let config = match store::load(&path) {
        Ok(config) => config,
        Err(e) => return CheckResult::new("Credential file", CheckStatus::Fail, e.to_string(), start),
    };

    let shown = path.display();
    match (config.state(), config.plaintext().is_some()) {
        (CredentialState::Initialized, false) => {
            CheckResult::new("Credential file", CheckStatus::Pass, format!("{shown} (initialized)"), start)
        }
        (CredentialState::Initialized, true) => CheckResult::new(
            "Credential file",
            CheckStatus::Warn,
            format!("{shown} still holds the plaintext; run `keybound setup --scrub`"),
            start,
        ),
        (CredentialState::Uninitialized, _) => CheckResult::new(
            "Credential file",
            CheckStatus::Warn,
            format!("{shown} is not encrypted yet; run `keybound setup`"),
            start,
        ),
        (CredentialState::Empty, _) => CheckResult::new(
            "Credential file",
            CheckStatus::Fail,
            format!("{shown} holds no credential"),
            start,
        ),
    }
}

fn check_decrypt<I: MachineIdentity>(workflow: &CredentialWorkflow<I>) -> CheckResult {
    let start = Instant::now();
    match workflow.load() {
        Ok(_) => CheckResult::new("Decrypt", CheckStatus::Pass, "ok", start),
        Err(KeyboundError::EmptyCredential) => {
            CheckResult::new("Decrypt", CheckStatus::Warn, "skipped (nothing encrypted)", start)
        }
        Err(e) if e.is_unrecoverable() => CheckResult::new(
            "Decrypt",
            CheckStatus::Fail,
            format!("{e}; re-run setup with the original plaintext"),
            start,
        ),
        Err(e) => CheckResult::new("Decrypt", CheckStatus::Fail, e.to_string(), start),
    }
}
