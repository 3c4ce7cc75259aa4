//! Concentrated loads on elements

use serde::{Deserialize, Serialize};

use super::LoadTerm;
use crate::math::{RefFrame, Vec3};

/// Tolerance deciding whether a load sits exactly on an element end
pub const NODAL_T_TOLERANCE: f64 = 1e-9;

/// A concentrated force or moment applied at a point of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentratedLoad {
    /// Loaded component
    pub term: LoadTerm,
    /// Whether the load is expressed in the element's local frame
    pub is_local: bool,
    /// Position parameter along the element (0 = start, 1 = end)
    pub t: f64,
    /// Load magnitude
    pub value: f64,
}

impl ConcentratedLoad {
    /// Create a new concentrated load
    pub fn new(term: LoadTerm, is_local: bool, t: f64, value: f64) -> Self {
        Self {
            term,
            is_local,
            t,
            value,
        }
    }

    /// Create a load in the element's local frame
    pub fn local(term: LoadTerm, t: f64, value: f64) -> Self {
        Self::new(term, true, t, value)
    }

    /// Create a load in the global frame
    pub fn global(term: LoadTerm, t: f64, value: f64) -> Self {
        Self::new(term, false, t, value)
    }

    /// Create a downward (negative global Y) load
    pub fn downward(t: f64, magnitude: f64) -> Self {
        Self::global(LoadTerm::Fy, t, -magnitude.abs())
    }

    /// Check if the load is applied exactly on the start or end of the element
    pub fn is_nodal(&self) -> bool {
        self.t.abs() < NODAL_T_TOLERANCE || (self.t - 1.0).abs() < NODAL_T_TOLERANCE
    }

    /// Check if the load is a moment
    pub fn is_moment(&self) -> bool {
        self.term == LoadTerm::Mz
    }

    /// `[Fx, Fy, Mz]` of this load in the element's local frame
    pub fn local_components(&self, frame: &RefFrame) -> Vec3 {
        self.term.local_components(self.value, self.is_local, frame)
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nodal_detection() {
        assert!(ConcentratedLoad::local(LoadTerm::Fx, 0.0, 1.0).is_nodal());
        assert!(ConcentratedLoad::local(LoadTerm::Fx, 1.0, 1.0).is_nodal());
        assert!(!ConcentratedLoad::local(LoadTerm::Fx, 0.5, 1.0).is_nodal());
    }

    #[test]
    fn test_downward_load_on_inclined_element() {
        let frame = RefFrame::from_direction(1.0, 1.0);
        let load = ConcentratedLoad::downward(0.5, 10.0);
        let local = load.local_components(&frame);

        let half = 10.0 / 2.0_f64.sqrt();
        assert_relative_eq!(local.x, -half, epsilon = 1e-12);
        assert_relative_eq!(local.y, -half, epsilon = 1e-12);
        assert_relative_eq!(load.scaled(2.0).value, -20.0);
    }
}
