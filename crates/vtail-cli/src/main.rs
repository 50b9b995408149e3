//! vtail-trim: trim a V-tail aircraft in pitch and check its static stability.
//!
//! Loads the tail moment curve, trims the tail angle by Newton-Raphson and
//! prints the report. Exits 1 when the data file (or config) cannot be
//! loaded; a non-converged trim still exits 0 with its best estimate.

mod args;
mod report;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vtail_core::RunConfig;
use vtail_models::AeroTable;
use vtail_trim::{analyze, VTailMomentModel};

use crate::args::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(1)
        }
    };

    if cli.pause {
        pause();
    }
    code
}

fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.json {
        report::write_banner(&mut out)?;
        out.flush()?;
    }

    let mut config = match &cli.config {
        Some(path) => RunConfig::from_path(path)?,
        None => RunConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate().context("invalid settings after command-line overrides")?;

    let table = if cli.strict {
        AeroTable::from_path_non_empty(&cli.data)
    } else {
        AeroTable::from_path(&cli.data)
    }
    .with_context(|| {
        format!("please ensure '{}' is in the working directory", cli.data.display())
    })?;

    let model = VTailMomentModel::new(&table, config.constants);
    info!(
        guess_deg = config.solver.initial_guess_deg,
        incidence_deg = config.solver.incidence_deg,
        dihedral_deg = config.constants.dihedral_deg(),
        tolerance = config.solver.tolerance,
        max_iterations = config.solver.max_iterations,
        "trimming"
    );
    let analysis = analyze(&model, config.solver, &config.stability);

    if cli.json {
        report::write_json(&mut out, table.len(), &analysis)?;
    } else {
        report::write_text(&mut out, table.len(), &analysis)?;
    }
    out.flush()?;
    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    // stdout carries the report; logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn pause() {
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
