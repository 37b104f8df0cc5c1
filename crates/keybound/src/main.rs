// SPDX-FileCopyrightText: 2026 Keybound Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! keybound - machine-bound encryption of an API credential file.
//!
//! This is the binary entry point.

mod commands;
mod doctor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keybound_config::KeyboundConfig;
use keybound_core::{KeyboundError, MachineIdentity};
use keybound_vault::{CredentialWorkflow, workflow_from_config};

/// keybound - machine-bound encryption of an API credential file.
#[derive(Parser, Debug)]
#[command(name = "keybound", version, about, long_about = None)]
struct Cli {
    /// Use this credential file instead of searching for one.
    #[arg(long, global = true, value_name = "PATH")]
    credential_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt the plaintext credential under this machine's identity.
    Setup {
        /// Clear plaintext_credential after encrypting.
        #[arg(long)]
        scrub: bool,
    },
    /// Decrypt the credential and print it masked.
    Show {
        /// Print the full credential.
        #[arg(long)]
        reveal: bool,
    },
    /// Print the credential file search order and the file in use.
    Locate,
    /// Check machine identity, credential file and decryption.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match keybound_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            keybound_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let workflow = match build_workflow(&cli, &config) {
        Ok(workflow) => workflow,
        Err(err) => {
            report_error(&err, false);
            std::process::exit(1);
        }
    };
    match run(cli.command, &workflow) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            report_error(&err, commands::is_unrecoverable(&err, &workflow));
            std::process::exit(1);
        }
    }
}

fn build_workflow(
    cli: &Cli,
    config: &KeyboundConfig,
) -> Result<CredentialWorkflow<Box<dyn MachineIdentity>>, KeyboundError> {
    workflow_from_config(config, cli.credential_file.clone())
}

fn run<I: MachineIdentity>(command: Commands, workflow: &CredentialWorkflow<I>) -> Result<String, KeyboundError> {
    match command {
        Commands::Setup { scrub } => commands::run_setup(workflow, scrub),
        Commands::Show { reveal } => commands::run_show(workflow, reveal),
        Commands::Locate => commands::run_locate(workflow),
        Commands::Doctor { plain } => {
            doctor::run_doctor(workflow, plain);
            Ok(String::new())
        }
    }
}

/// Initialize the tracing subscriber on stderr. `RUST_LOG` takes precedence
/// over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    // `keybound` also matches the keybound_vault and keybound_config targets.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keybound={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &KeyboundError, unrecoverable: bool) {
    use colored::Colorize;
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    if handler.render_report(&mut buf, err as &dyn miette::Diagnostic).is_ok() {
        eprint!("{buf}");
    } else {
        eprintln!("Error: {err}");
    }

    if unrecoverable {
        eprintln!();
        eprintln!(
            "{}",
            "The credential cannot be recovered on this machine. Put the original plaintext back in \
             plaintext_credential and run `keybound setup`."
                .red()
                .bold()
        );
    }
}
