//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Material properties for structural analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Name the material is referenced by
    pub name: String,
    /// Density in kg/m³
    pub density: f64,
    /// Modulus of elasticity (Young's modulus) in Pa
    pub young_mod: f64,
    /// Shear modulus in Pa
    pub shear_mod: f64,
    /// Poisson's ratio
    pub poisson_ratio: f64,
    /// Yield strength in Pa
    pub yield_strength: f64,
    /// Ultimate strength in Pa
    pub ultimate_strength: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(
        name: &str,
        density: f64,
        young_mod: f64,
        shear_mod: f64,
        poisson_ratio: f64,
        yield_strength: f64,
        ultimate_strength: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            density,
            young_mod,
            shear_mod,
            poisson_ratio,
            yield_strength,
            ultimate_strength,
        }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(name: &str, young_mod: f64, poisson_ratio: f64, density: f64) -> Self {
        let shear_mod = young_mod / (2.0 * (1.0 + poisson_ratio));
        Self::new(name, density, young_mod, shear_mod, poisson_ratio, 0.0, 0.0)
    }

    /// Set yield and ultimate strengths
    pub fn with_strengths(mut self, yield_strength: f64, ultimate_strength: f64) -> Self {
        self.yield_strength = yield_strength;
        self.ultimate_strength = ultimate_strength;
        self
    }

    /// Create a standard steel material (S275)
    pub fn steel(name: &str) -> Self {
        Self::new(name, 7850.0, 200e9, 77e9, 0.3, 275e6, 430e6)
    }

    /// Check the properties the analysis relies on: a positive finite
    /// Young's modulus and a finite, non-negative density
    pub fn validate(&self) -> FrameResult<()> {
        if !(self.young_mod.is_finite() && self.young_mod > 0.0) {
            return Err(FrameError::InvalidInput(format!(
                "material '{}' has Young's modulus {}, expected a positive value",
                self.name, self.young_mod
            )));
        }
        if !(self.density.is_finite() && self.density >= 0.0) {
            return Err(FrameError::InvalidInput(format!(
                "material '{}' has density {}, expected a non-negative value",
                self.name, self.density
            )));
        }
        Ok(())
    }

    /// Create an aluminum material (6061-T6)
    pub fn aluminum(name: &str) -> Self {
        Self::new(name, 2700.0, 68.9e9, 26e9, 0.33, 276e6, 310e6)
    }
}
