use std::fmt;

use tracing::{debug, trace, warn};
use vtail_core::{SolverSettings, StabilitySettings};

use crate::moment::PitchingMoment;

/// Where the Newton-Raphson iteration currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimPhase {
    Iterating,
    Converged,
    MaxIterExceeded,
}

/// Terminal outcome of a trim run. Neither variant is an error; running out
/// of iterations still carries the best available estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimOutcome {
    Converged,
    MaxIterExceeded,
}

impl TrimOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TrimOutcome::Converged => "CONVERGED",
            TrimOutcome::MaxIterExceeded => "MAX_ITER_EXCEEDED",
        }
    }
}

impl fmt::Display for TrimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient solver state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimState {
    pub tail_angle_deg: f64,
    pub iterations: usize,
    /// Moment at `tail_angle_deg` as of the last evaluation (NaN before the first).
    pub last_moment: f64,
    pub phase: TrimPhase,
}

impl TrimState {
    pub fn new(initial_guess_deg: f64) -> Self {
        Self {
            tail_angle_deg: initial_guess_deg,
            iterations: 0,
            last_moment: f64::NAN,
            phase: TrimPhase::Iterating,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase != TrimPhase::Iterating
    }
}

/// Result of a trim run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimResult {
    pub outcome: TrimOutcome,
    /// Trimmed tail angle, or the best estimate when iterations ran out [deg]
    pub tail_angle_deg: f64,
    pub incidence_deg: f64,
    /// Newton iterations performed before the convergence test passed
    /// (`max_iterations` when it never did)
    pub iterations: usize,
    /// Total moment re-evaluated at the final tail angle
    pub residual: f64,
}

impl TrimResult {
    pub fn is_converged(&self) -> bool {
        self.outcome == TrimOutcome::Converged
    }
}

/// Newton-Raphson trim on the tail angle at fixed incidence.
pub struct TrimSolver<'m, M: ?Sized> {
    model: &'m M,
    settings: SolverSettings,
}

impl<'m, M> TrimSolver<'m, M>
where
    M: PitchingMoment + ?Sized,
{
    pub fn new(model: &'m M, settings: SolverSettings) -> Self {
        Self { model, settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Advance one iteration. No-op once the state is terminal.
    pub fn step(&self, state: &mut TrimState) {
        if state.is_done() {
            return;
        }
        let s = &self.settings;

        if state.iterations >= s.max_iterations {
            state.phase = TrimPhase::MaxIterExceeded;
            return;
        }

        let cm = self.model.total_moment(state.tail_angle_deg, s.incidence_deg);
        state.last_moment = cm;
        trace!(iteration = state.iterations, tail_angle_deg = state.tail_angle_deg, cm, "trim iteration");

        if cm.abs() < s.tolerance {
            state.phase = TrimPhase::Converged;
            return;
        }

        // Forward difference dCm/dδ
        let h = s.derivative_step_deg;
        let cm_plus = self.model.total_moment(state.tail_angle_deg + h, s.incidence_deg);
        let gradient = (cm_plus - cm) / h;

        if gradient.abs() < s.gradient_floor {
            // Flat spot: nudge instead of dividing by ~0
            debug!(
                iteration = state.iterations,
                tail_angle_deg = state.tail_angle_deg,
                gradient,
                nudge_deg = s.stall_nudge_deg,
                "near-zero moment gradient, nudging tail angle"
            );
            state.tail_angle_deg += s.stall_nudge_deg;
        } else {
            state.tail_angle_deg -= cm / gradient;
        }
        state.iterations += 1;
    }

    /// Iterate until converged or out of iterations. Never fails.
    pub fn solve(&self) -> TrimResult {
        let s = &self.settings;
        let mut state = TrimState::new(s.initial_guess_deg);
        while !state.is_done() {
            self.step(&mut state);
        }

        let outcome = match state.phase {
            TrimPhase::Converged => TrimOutcome::Converged,
            _ => TrimOutcome::MaxIterExceeded,
        };
        let residual = self.model.total_moment(state.tail_angle_deg, s.incidence_deg);

        match outcome {
            TrimOutcome::Converged => debug!(
                iterations = state.iterations,
                tail_angle_deg = state.tail_angle_deg,
                residual,
                "trim converged"
            ),
            TrimOutcome::MaxIterExceeded => warn!(
                max_iterations = s.max_iterations,
                tail_angle_deg = state.tail_angle_deg,
                residual,
                tolerance = s.tolerance,
                "trim did not converge; reporting best estimate"
            ),
        }

        TrimResult {
            outcome,
            tail_angle_deg: state.tail_angle_deg,
            incidence_deg: s.incidence_deg,
            iterations: state.iterations,
            residual,
        }
    }
}

/* ---------------------------- stability check ---------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stability {
    Stable,
    Unstable,
}

impl Stability {
    /// Negative Cma restores the aircraft; zero or positive does not.
    pub fn from_cma(cma: f64) -> Self {
        if cma < 0.0 { Stability::Stable } else { Stability::Unstable }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stability::Stable => "STABLE",
            Stability::Unstable => "UNSTABLE",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityCheck {
    /// dCm/di by forward difference [1/deg]
    pub cma_per_deg: f64,
    pub perturbation_deg: f64,
    pub perturbed_moment: f64,
    pub stability: Stability,
}

/// Perturb the incidence at the trimmed tail angle and take the moment slope.
///
/// Reuses `trim.tail_angle_deg` and `trim.residual`; nothing is re-trimmed.
pub fn stability_check<M>(model: &M, trim: &TrimResult, settings: &StabilitySettings) -> StabilityCheck
where
    M: PitchingMoment + ?Sized,
{
    let delta = settings.incidence_perturbation_deg;
    let perturbed_moment = model.total_moment(trim.tail_angle_deg, trim.incidence_deg + delta);
    let cma_per_deg = (perturbed_moment - trim.residual) / delta;

    StabilityCheck {
        cma_per_deg,
        perturbation_deg: delta,
        perturbed_moment,
        stability: Stability::from_cma(cma_per_deg),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimAnalysis {
    pub trim: TrimResult,
    pub stability: StabilityCheck,
}

/// Trim, then check static stability at the trimmed condition.
pub fn analyze<M>(model: &M, solver: SolverSettings, stability: &StabilitySettings) -> TrimAnalysis
where
    M: PitchingMoment + ?Sized,
{
    let trim = TrimSolver::new(model, solver).solve();
    let stability = stability_check(model, &trim, stability);
    TrimAnalysis { trim, stability }
}

/* -------------------------------- tests -------------------------------- */
