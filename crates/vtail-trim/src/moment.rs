use vtail_core::{deg_to_rad, PhysicalConstants};
use vtail_models::AeroTable;

/// Empirical quadratic term of the tail force polar: 0.0046 + 0.1050*(at*α)^2.
/// Part of the physical model, not a tuning knob.
const QUAD_BASE: f64 = 0.0046;
const QUAD_GAIN: f64 = 0.1050;

/// Total pitching-moment coefficient as a function of tail angle and
/// aircraft incidence, both in degrees.
///
/// Implementations must be pure: equal inputs give bit-identical outputs.
pub trait PitchingMoment {
    fn total_moment(&self, tail_angle_deg: f64, incidence_deg: f64) -> f64;
}

impl<F> PitchingMoment for F
where
    F: Fn(f64, f64) -> f64,
{
    fn total_moment(&self, tail_angle_deg: f64, incidence_deg: f64) -> f64 {
        self(tail_angle_deg, incidence_deg)
    }
}

/// Individual contributions of one moment evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentBreakdown {
    pub total_angle_deg: f64,
    /// Tail aerodynamic-centre moment, (Cm_act) * sin(Γ)
    pub cm_ac_tail: f64,
    /// Lift-based term, already scaled by the longitudinal volume coefficient
    pub longitudinal_term: f64,
    /// Drag/tilt-based term, already scaled by the vertical volume coefficient
    pub vertical_term: f64,
    pub cm_tail: f64,
    pub total: f64,
}

/// V-tail aircraft: measured tail curve + closed-form geometry terms.
///
/// Borrows the table; the constants are copied in since they are a handful
/// of floats fixed for the run.
#[derive(Clone, Copy, Debug)]
pub struct VTailMomentModel<'a> {
    table: &'a AeroTable,
    constants: PhysicalConstants,
}

impl<'a> VTailMomentModel<'a> {
    pub fn new(table: &'a AeroTable, constants: PhysicalConstants) -> Self {
        Self { table, constants }
    }

    pub fn table(&self) -> &AeroTable {
        self.table
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Evaluate every term of the moment equation.
    ///
    /// The table lookup and the `at*α` factor take the angle in degrees; only
    /// the sin/cos of the force resolution use radians. Keep it that way.
    pub fn breakdown(&self, tail_angle_deg: f64, incidence_deg: f64) -> MomentBreakdown {
        let c = &self.constants;

        // Total angle seen by the tail
        let total_angle_deg = tail_angle_deg + incidence_deg;
        let total_angle_rad = deg_to_rad(total_angle_deg);
        let (sin_a, cos_a) = (total_angle_rad.sin(), total_angle_rad.cos());

        let cm_ac_tail = self.table.query(total_angle_deg) * c.sin_dihedral;

        let geom = c.correction_const * total_angle_deg;
        let quad = QUAD_BASE + QUAD_GAIN * (geom * geom);

        let lift = geom * cos_a * c.cos_dihedral + quad * sin_a;
        let longitudinal_term = lift * c.vol_coeff_longitudinal;

        let drag = geom * sin_a * c.cos_dihedral - quad * cos_a;
        let vertical_term = drag * c.vol_coeff_vertical;

        let cm_tail = cm_ac_tail - longitudinal_term + vertical_term;
        let total = c.cm_wing + cm_tail + c.cm_propulsion;

        MomentBreakdown {
            total_angle_deg,
            cm_ac_tail,
            longitudinal_term,
            vertical_term,
            cm_tail,
            total,
        }
    }
}

impl PitchingMoment for VTailMomentModel<'_> {
    fn total_moment(&self, tail_angle_deg: f64, incidence_deg: f64) -> f64 {
        self.breakdown(tail_angle_deg, incidence_deg).total
    }
}

/* -------------------------------- tests -------------------------------- */
