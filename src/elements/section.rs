//! Section properties for frame elements

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Cross-section properties for frame elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Name the section is referenced by
    pub name: String,
    /// Cross-sectional area in m²
    pub area: f64,
    /// Moment of inertia about the strong axis in m⁴
    pub i_strong: f64,
    /// Moment of inertia about the weak axis in m⁴
    pub i_weak: f64,
    /// Elastic section modulus about the strong axis in m³
    pub sm_strong: f64,
    /// Elastic section modulus about the weak axis in m³
    pub sm_weak: f64,
}

impl Section {
    /// Create a new section with all properties
    pub fn new(name: &str, area: f64, i_strong: f64, i_weak: f64, sm_strong: f64, sm_weak: f64) -> Self {
        Self {
            name: name.to_string(),
            area,
            i_strong,
            i_weak,
            sm_strong,
            sm_weak,
        }
    }

    /// Create a rectangular section
    pub fn rectangular(name: &str, width: f64, depth: f64) -> Self {
        Self {
            name: name.to_string(),
            area: width * depth,
            i_strong: width * depth.powi(3) / 12.0,
            i_weak: depth * width.powi(3) / 12.0,
            sm_strong: width * depth.powi(2) / 6.0,
            sm_weak: depth * width.powi(2) / 6.0,
        }
    }

    /// Create a circular section
    pub fn circular(name: &str, diameter: f64) -> Self {
        let r = diameter / 2.0;
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        let sm = i / r;

        Self {
            name: name.to_string(),
            area: std::f64::consts::PI * r.powi(2),
            i_strong: i,
            i_weak: i,
            sm_strong: sm,
            sm_weak: sm,
        }
    }

    /// Create a wide flange (I-beam) section
    ///
    /// # Arguments
    /// * `depth` - Total depth of section
    /// * `flange_width` - Width of flange
    /// * `flange_thickness` - Thickness of flange
    /// * `web_thickness` - Thickness of web
    pub fn wide_flange(
        name: &str,
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let d = depth;
        let hw = d - 2.0 * tf;

        let i_strong = (bf * d.powi(3) - (bf - tw) * hw.powi(3)) / 12.0;
        let i_weak = (2.0 * tf * bf.powi(3) + hw * tw.powi(3)) / 12.0;

        Self {
            name: name.to_string(),
            area: 2.0 * bf * tf + hw * tw,
            i_strong,
            i_weak,
            sm_strong: i_strong / (d / 2.0),
            sm_weak: i_weak / (bf / 2.0),
        }
    }

    /// Get the radius of gyration about the strong axis
    pub fn r_strong(&self) -> f64 {
        (self.i_strong / self.area).sqrt()
    }

    /// Check the properties the analysis divides by or builds stiffness
    /// from: area, strong axis inertia and strong axis section modulus must
    /// be positive and finite
    pub fn validate(&self) -> FrameResult<()> {
        for (property, value) in [
            ("area", self.area),
            ("strong axis inertia", self.i_strong),
            ("strong axis section modulus", self.sm_strong),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FrameError::InvalidInput(format!(
                    "section '{}' has {} {}, expected a positive value",
                    self.name, property, value
                )));
            }
        }
        Ok(())
    }
}
