use std::path::PathBuf;

use clap::{ArgAction, Parser};
use vtail_core::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "vtail-trim")]
#[command(version)]
#[command(about = "Longitudinal trim & static stability analyzer for V-tail aircraft", long_about = None)]
pub struct Cli {
    /// Two-column tail data file: alpha (deg) and Cm per line
    #[arg(default_value = "datat.txt")]
    pub data: PathBuf,

    /// JSON run configuration (constants, solver, stability)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Aircraft incidence angle (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub incidence: Option<f64>,

    /// Initial tail-angle guess (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub guess: Option<f64>,

    /// Convergence tolerance on |Cm|
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Maximum Newton-Raphson iterations
    #[arg(long = "max-iter")]
    pub max_iter: Option<usize>,

    /// V-tail dihedral angle (degrees); replaces the stored sine/cosine
    #[arg(long, allow_negative_numbers = true)]
    pub dihedral: Option<f64>,

    /// Incidence perturbation for the stability derivative (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub perturbation: Option<f64>,

    /// Fail if the data file holds no numeric pairs
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Command-line values win over the config file.
    pub fn apply_overrides(&self, cfg: &mut RunConfig) {
        if let Some(v) = self.incidence {
            cfg.solver.incidence_deg = v;
        }
        if let Some(v) = self.guess {
            cfg.solver.initial_guess_deg = v;
        }
        if let Some(v) = self.tolerance {
            cfg.solver.tolerance = v;
        }
        if let Some(v) = self.max_iter {
            cfg.solver.max_iterations = v;
        }
        if let Some(v) = self.dihedral {
            cfg.constants = cfg.constants.with_dihedral_deg(v);
        }
        if let Some(v) = self.perturbation {
            cfg.stability.incidence_perturbation_deg = v;
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
