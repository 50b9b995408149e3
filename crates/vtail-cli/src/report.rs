// Human-readable and JSON renderings of a trim analysis.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use vtail_trim::{StabilityCheck, TrimAnalysis, TrimResult};

/* --------------------------- Shared DTOs (JSON) --------------------------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTrim {
    /// "CONVERGED" | "MAX_ITER_EXCEEDED"
    pub status: String,
    pub iterations: usize,
    pub tail_angle_deg: f64,
    pub incidence_deg: f64,
    pub residual: f64,
}

impl From<&TrimResult> for JsonTrim {
    fn from(t: &TrimResult) -> Self {
        JsonTrim {
            status: t.outcome.to_string(),
            iterations: t.iterations,
            tail_angle_deg: t.tail_angle_deg,
            incidence_deg: t.incidence_deg,
            residual: t.residual,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonStability {
    pub cma_per_deg: f64,
    pub perturbation_deg: f64,
    /// "STABLE" | "UNSTABLE"
    pub verdict: String,
}

impl From<&StabilityCheck> for JsonStability {
    fn from(s: &StabilityCheck) -> Self {
        JsonStability {
            cma_per_deg: s.cma_per_deg,
            perturbation_deg: s.perturbation_deg,
            verdict: s.stability.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub data_points: usize,
    pub trim: JsonTrim,
    pub stability: JsonStability,
}

impl JsonReport {
    pub fn new(data_points: usize, analysis: &TrimAnalysis) -> Self {
        JsonReport {
            data_points,
            trim: (&analysis.trim).into(),
            stability: (&analysis.stability).into(),
        }
    }
}

/* ------------------------------ Text report ------------------------------ */

pub fn write_banner<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "==============================================")?;
    writeln!(w, "              STABILITY SOLVER                ")?;
    writeln!(w, "       Physics Model: V-Tail w/ Dihedral      ")?;
    writeln!(w, "==============================================")
}

pub fn write_loaded<W: Write>(w: &mut W, data_points: usize) -> io::Result<()> {
    writeln!(w, "Database: Loaded {data_points} aerodynamic data points.")
}

pub fn write_trim<W: Write>(w: &mut W, trim: &TrimResult) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "[1] TRIMMING AIRCRAFT (Newton-Raphson Solver)...")?;
    writeln!(w, "   -> Iterations: {}", trim.iterations)?;
    writeln!(w, "   -> Trimmed Tail Angle: {:.5} deg", trim.tail_angle_deg)?;
    writeln!(w, "   -> Residual Moment:    {}", scientific(trim.residual))?;
    writeln!(w, "   -> Solver Status:      {}", trim.outcome)
}

pub fn write_stability<W: Write>(w: &mut W, check: &StabilityCheck) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "[2] CHECKING STATIC STABILITY...")?;
    writeln!(w, "   -> Stability Derivative (Cma): {:.5} /deg", check.cma_per_deg)?;
    writeln!(w, ">>> RESULT: {} configuration.", check.stability)
}

/// Console report after the banner, which goes out before the data file is read.
pub fn write_text<W: Write>(w: &mut W, data_points: usize, analysis: &TrimAnalysis) -> io::Result<()> {
    write_loaded(w, data_points)?;
    write_trim(w, &analysis.trim)?;
    write_stability(w, &analysis.stability)
}

/// `{:.5e}` with a signed exponent of at least two digits (`6.54021e-08`).
fn scientific(v: f64) -> String {
    let s = format!("{v:.5e}");
    match s.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
        Some((mantissa, Ok(exp))) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        _ => s,
    }
}

pub fn write_json<W: Write>(w: &mut W, data_points: usize, analysis: &TrimAnalysis) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, &JsonReport::new(data_points, analysis))?;
    writeln!(w)
}

/* -------------------------------- tests -------------------------------- */
