//! vtail-trim
//!
//! Longitudinal trim and static stability of a V-tail aircraft.
//! - Total pitching moment from the measured tail curve (`vtail-models`)
//!   plus closed-form V-tail lift/drag terms and the fixed wing and
//!   propulsion contributions.
//! - Newton-Raphson on the tail angle with a forward-difference derivative
//!   drives the total moment to zero.
//! - A one-sided incidence perturbation at the trimmed tail angle gives the
//!   stability derivative Cma and the STABLE/UNSTABLE verdict.
//!
//! Maths:
//!   Cm = Cm_w + Cm_t(δ + i) + Cm_p
//!   δ_{k+1} = δ_k - Cm(δ_k) / [(Cm(δ_k + h) - Cm(δ_k)) / h]
//!   Cma = (Cm(δ*, i + Δi) - Cm(δ*, i)) / Δi     (per degree)
//!
//! Any `Fn(tail_deg, incidence_deg) -> f64` can stand in for the model, which
//! is how synthetic moment curves are fed to the solver.

mod moment;
mod solver;

pub use moment::{MomentBreakdown, PitchingMoment, VTailMomentModel};
pub use solver::{
    analyze, stability_check, Stability, StabilityCheck, TrimAnalysis, TrimOutcome, TrimPhase,
    TrimResult, TrimSolver, TrimState,
};

pub use vtail_core::{PhysicalConstants, SolverSettings, StabilitySettings};
pub use vtail_models::AeroTable;
