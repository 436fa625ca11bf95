use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Tunable parameters for one simulation run.
///
/// Defaults describe a 1280x720 viewport filled with 60 bubbles of base
/// radius 30 +/- 5, damped wall bounces, and gravity disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of particles in the population (fixed for the run's lifetime).
    pub count: usize,

    /// Viewport width.
    pub width: f64,

    /// Viewport height.
    pub height: f64,

    /// Base particle radius.
    pub base_radius: f64,

    /// Half-width of the radius band sampled around `base_radius`.
    #[serde(default)]
    pub radius_diversity: f64,

    /// Vertical acceleration added to a particle's velocity each tick.
    #[serde(default)]
    pub gravity: f64,

    /// Damping applied to the velocity component inverted by a wall bounce.
    #[serde(default = "default_friction")]
    pub friction: f64,
}

fn default_friction() -> f64 {
    0.99
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            count: 60,
            width: 1280.0,
            height: 720.0,
            base_radius: 30.0,
            radius_diversity: 5.0,
            gravity: 0.0,
            friction: default_friction(),
        }
    }
}

impl SimConfig {
    /// Check all parameter invariants.
    ///
    /// Errors with `Error::InvalidParam` on the first violated invariant.
    /// Called once by `Simulation::new`; ticks never re-validate.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidParam("count must be > 0".into()));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(Error::InvalidParam("width must be finite and > 0".into()));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(Error::InvalidParam("height must be finite and > 0".into()));
        }
        if !self.base_radius.is_finite() || self.base_radius <= 0.0 {
            return Err(Error::InvalidParam(
                "base_radius must be finite and > 0".into(),
            ));
        }
        if !self.radius_diversity.is_finite() || self.radius_diversity < 0.0 {
            return Err(Error::InvalidParam(
                "radius_diversity must be finite and >= 0".into(),
            ));
        }
        if !self.gravity.is_finite() {
            return Err(Error::InvalidParam("gravity must be finite".into()));
        }
        if !self.friction.is_finite() || !(0.0..=1.0).contains(&self.friction) {
            return Err(Error::InvalidParam(
                "friction must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the configuration to a JSON file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
