//! Core definitions shared by the V-tail trim workspace
//!
//! Includes:
//! - Angle units & conversions (degrees/radians)
//! - Physical constants of the aircraft (wing, propulsion, V-tail geometry)
//! - Newton-Raphson solver and stability-check settings
//! - Run configuration loaded from JSON, with validation

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// -------------------------
/// Units & Conversions
/// -------------------------

pub const DEG_TO_RAD: f64 = PI / 180.0;

pub fn deg_to_rad(deg: f64) -> f64 { deg * DEG_TO_RAD }
pub fn rad_to_deg(rad: f64) -> f64 { rad / DEG_TO_RAD }

/// -------------------------
/// Physical Constants
/// -------------------------

/// Read-only aircraft parameters for one run.
///
/// The dihedral is carried as its sine and cosine. The defaults are the
/// published (rounded) values for a 20.6° V-tail and are deliberately not
/// recomputed from the angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicalConstants {
    pub cm_wing: f64,                // wing/body Cm about the reference point
    pub cm_propulsion: f64,          // propulsion Cm
    pub sin_dihedral: f64,           // sin(Γ)
    pub cos_dihedral: f64,           // cos(Γ)
    pub vol_coeff_longitudinal: f64, // (lt*St)/(c*S)
    pub vol_coeff_vertical: f64,     // (zt*St)/(c*S)
    pub correction_const: f64,       // 3-D lift-curve correction (at)
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            cm_wing: -0.17413,
            cm_propulsion: -0.0012,
            sin_dihedral: 0.352,
            cos_dihedral: 0.93606,
            vol_coeff_longitudinal: 0.355,
            vol_coeff_vertical: 0.0266,
            correction_const: 0.0781,
        }
    }
}

impl PhysicalConstants {
    /// Same constants with the dihedral sine/cosine derived from an angle [deg].
    pub fn with_dihedral_deg(self, dihedral_deg: f64) -> Self {
        let (sin, cos) = deg_to_rad(dihedral_deg).sin_cos();
        Self { sin_dihedral: sin, cos_dihedral: cos, ..self }
    }

    /// Dihedral angle [deg] implied by the stored sine/cosine.
    pub fn dihedral_deg(&self) -> f64 {
        rad_to_deg(self.sin_dihedral.atan2(self.cos_dihedral))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("constants.cm_wing", self.cm_wing),
            ("constants.cm_propulsion", self.cm_propulsion),
            ("constants.sin_dihedral", self.sin_dihedral),
            ("constants.cos_dihedral", self.cos_dihedral),
            ("constants.vol_coeff_longitudinal", self.vol_coeff_longitudinal),
            ("constants.vol_coeff_vertical", self.vol_coeff_vertical),
            ("constants.correction_const", self.correction_const),
        ];
        for (name, value) in fields {
            require_finite(name, value)?;
        }
        Ok(())
    }
}

/// -------------------------
/// Solver Settings
/// -------------------------

/// Newton-Raphson trim settings. Angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    pub initial_guess_deg: f64,
    pub incidence_deg: f64,
    /// Converged once |Cm| drops strictly below this.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Forward-difference step for dCm/dδ.
    pub derivative_step_deg: f64,
    /// Gradients smaller than this trigger the stall nudge instead of a Newton step.
    pub gradient_floor: f64,
    pub stall_nudge_deg: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            initial_guess_deg: -2.0,
            incidence_deg: 0.0,
            tolerance: 1e-6,
            max_iterations: 100,
            derivative_step_deg: 0.001,
            gradient_floor: 1e-9,
            stall_nudge_deg: 0.1,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("solver.initial_guess_deg", self.initial_guess_deg)?;
        require_finite("solver.incidence_deg", self.incidence_deg)?;
        require_finite("solver.tolerance", self.tolerance)?;
        require_finite("solver.derivative_step_deg", self.derivative_step_deg)?;
        require_finite("solver.gradient_floor", self.gradient_floor)?;
        require_finite("solver.stall_nudge_deg", self.stall_nudge_deg)?;

        if self.tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "solver.tolerance must be >= 0, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("solver.max_iterations must be at least 1".into()));
        }
        if self.derivative_step_deg == 0.0 {
            return Err(ConfigError::Invalid("solver.derivative_step_deg must be non-zero".into()));
        }
        if self.gradient_floor < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "solver.gradient_floor must be >= 0, got {}",
                self.gradient_floor
            )));
        }
        Ok(())
    }
}

/// Finite-difference stability check settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StabilitySettings {
    /// Incidence perturbation [deg] used for Cma.
    pub incidence_perturbation_deg: f64,
}

impl Default for StabilitySettings {
    fn default() -> Self {
        Self { incidence_perturbation_deg: 1.0 }
    }
}

impl StabilitySettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("stability.incidence_perturbation_deg", self.incidence_perturbation_deg)?;
        if self.incidence_perturbation_deg == 0.0 {
            return Err(ConfigError::Invalid(
                "stability.incidence_perturbation_deg must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// -------------------------
/// Run Configuration
/// -------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a trim run needs besides the aerodynamic table.
///
/// Every field has a default, so an empty JSON object `{}` is a valid config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub constants: PhysicalConstants,
    pub solver: SolverSettings,
    pub stability: StabilitySettings,
}

impl RunConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: RunConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.constants.validate()?;
        self.solver.validate()?;
        self.stability.validate()
    }
}

fn require_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")))
    }
}

/* -------------------------------- tests -------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    #[test]
    fn angle_conversions_invert() {
        assert_abs_diff_eq!(deg_to_rad(180.0), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(rad_to_deg(deg_to_rad(37.5)), 37.5, epsilon = 1e-12);
    }

    #[test]
    fn default_dihedral_is_about_twenty_degrees() {
        let c = PhysicalConstants::default();
        // Rounded sine/cosine do not land exactly on 20.6°
        assert_abs_diff_eq!(c.dihedral_deg(), 20.6, epsilon = 0.05);
    }

    #[test]
    fn with_dihedral_recomputes_sine_and_cosine() {
        let c = PhysicalConstants::default().with_dihedral_deg(30.0);
        assert_abs_diff_eq!(c.sin_dihedral, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.cos_dihedral, 3f64.sqrt() / 2.0, epsilon = 1e-12);
        assert_eq!(c.cm_wing, PhysicalConstants::default().cm_wing);
    }

    #[test]
    fn empty_json_gives_defaults() {
        let cfg = RunConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg = RunConfig::from_json_str(
            r#"{ "solver": { "tolerance": 1e-9, "max_iterations": 25 },
                 "constants": { "cm_wing": -0.2 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.solver.tolerance, 1e-9);
        assert_eq!(cfg.solver.max_iterations, 25);
        assert_eq!(cfg.solver.initial_guess_deg, -2.0);
        assert_eq!(cfg.constants.cm_wing, -0.2);
        assert_eq!(cfg.constants.cm_propulsion, -0.0012);
        assert_eq!(cfg.stability, StabilitySettings::default());
    }

    #[test]
    fn zero_tolerance_is_legal() {
        let cfg = RunConfig::from_json_str(r#"{ "solver": { "tolerance": 0.0 } }"#).unwrap();
        assert_eq!(cfg.solver.tolerance, 0.0);
    }

    #[test]
    fn rejects_bad_settings() {
        for doc in [
            r#"{ "solver": { "derivative_step_deg": 0.0 } }"#,
            r#"{ "solver": { "max_iterations": 0 } }"#,
            r#"{ "solver": { "tolerance": -1.0 } }"#,
            r#"{ "solver": { "gradient_floor": -1e-9 } }"#,
            r#"{ "stability": { "incidence_perturbation_deg": 0.0 } }"#,
        ] {
            let err = RunConfig::from_json_str(doc).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{doc} -> {err}");
        }
    }

    #[test]
    fn rejects_unknown_fields_and_bad_json() {
        assert!(matches!(
            RunConfig::from_json_str(r#"{ "solver": { "tolerence": 1e-6 } }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(RunConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn reads_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "stability": {{ "incidence_perturbation_deg": 0.5 }} }}"#).unwrap();
        let cfg = RunConfig::from_path(file.path()).unwrap();
        assert_eq!(cfg.stability.incidence_perturbation_deg, 0.5);
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let err = RunConfig::from_path("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
