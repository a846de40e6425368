// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// trapcrop: camera-trap photo preparation.
//
// Entry point. Initialises logging, parses arguments, and runs one batch.
// Stdout carries only the per-photo progress lines; logs go to stderr.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use trapcrop_batch::{BatchDriver, ConsoleProgress, SilentProgress};
use trapcrop_core::error::Result;
use trapcrop_core::types::BatchReport;

use cli::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "trapcrop starting");

    match run(&cli) {
        Ok(report) => {
            for failed in &report.failed {
                tracing::warn!(
                    file = %failed.input.display(),
                    reason = %failed.reason,
                    "skipped"
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "trapcrop failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<BatchReport> {
    let driver = BatchDriver::new(cli.to_batch_config()?)?;
    if cli.quiet {
        driver.run(&SilentProgress)
    } else {
        driver.run(&ConsoleProgress::new())
    }
}
