//! Result types for plane frame analysis

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::model::StructureMetadata;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, RZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            rz: arr[2],
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }
}

/// Reaction forces at a supported node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Y direction
    pub fy: f64,
    /// Reaction moment about Z axis
    pub mz: f64,
}

impl Reaction {
    /// Create from array [FX, FY, MZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            mz: arr[2],
        }
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2)).sqrt()
    }
}

/// A value at a position parameter along an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub t: f64,
    pub value: f64,
}

impl PointValue {
    pub fn new(t: f64, value: f64) -> Self {
        Self { t, value }
    }
}

/// Displacements and internal forces along an element, one value per
/// analysis point
///
/// Force and stress values are right-hand limits: the value at `t` is the
/// one just after the point, so a jump from a concentrated load shows up at
/// the point where it is applied. The final point at `t = 1` reports the
/// value closing the element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSolution {
    pub element_id: String,
    pub global_x_displacement: Vec<PointValue>,
    pub global_y_displacement: Vec<PointValue>,
    pub local_x_displacement: Vec<PointValue>,
    pub local_y_displacement: Vec<PointValue>,
    pub z_rotation: Vec<PointValue>,
    /// Axial stress (positive = tension)
    pub axial_stress: Vec<PointValue>,
    pub shear_force: Vec<PointValue>,
    /// Bending moment (positive = sagging)
    pub bending_moment: Vec<PointValue>,
    /// Bending stress at the top fiber, moment over strong section modulus
    pub bending_stress: Vec<PointValue>,
}

impl ElementSolution {
    pub fn new(element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            ..Self::default()
        }
    }

    /// Largest absolute bending moment along the element
    pub fn max_bending_moment(&self) -> f64 {
        max_abs(&self.bending_moment)
    }

    /// Largest absolute axial stress along the element
    pub fn max_axial_stress(&self) -> f64 {
        max_abs(&self.axial_stress)
    }

    /// Largest absolute shear force along the element
    pub fn max_shear_force(&self) -> f64 {
        max_abs(&self.shear_force)
    }

    /// Largest translation of any analysis point
    pub fn max_displacement(&self) -> f64 {
        self.global_x_displacement
            .iter()
            .zip(&self.global_y_displacement)
            .map(|(x, y)| x.value.hypot(y.value))
            .fold(0.0, f64::max)
    }
}

fn max_abs(values: &[PointValue]) -> f64 {
    values.iter().map(|v| v.value.abs()).fold(0.0, f64::max)
}

/// Complete solution of a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Metadata of the solved structure
    pub metadata: StructureMetadata,
    /// Size of the solved system
    pub dof_count: usize,
    /// Iterations the solver needed
    pub iterations: usize,
    /// Per element results, in DOF numbering order
    pub elements: Vec<ElementSolution>,
    /// Displacements of the structural nodes
    pub node_displacements: BTreeMap<String, NodeDisplacement>,
    /// Reactions at the externally constrained nodes
    pub reactions: BTreeMap<String, Reaction>,
}

impl Solution {
    pub fn element(&self, id: &str) -> FrameResult<&ElementSolution> {
        self.elements
            .iter()
            .find(|e| e.element_id == id)
            .ok_or_else(|| FrameError::ElementNotFound(id.to_string()))
    }

    pub fn node_displacement(&self, id: &str) -> FrameResult<NodeDisplacement> {
        self.node_displacements
            .get(id)
            .copied()
            .ok_or_else(|| FrameError::NodeNotFound(id.to_string()))
    }

    /// Reaction at a constrained node
    pub fn reaction(&self, id: &str) -> FrameResult<Reaction> {
        self.reactions
            .get(id)
            .copied()
            .ok_or_else(|| FrameError::NodeNotFound(id.to_string()))
    }

    pub fn reactions(&self) -> impl Iterator<Item = (&str, &Reaction)> {
        self.reactions.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Sum of all reactions
    pub fn total_reaction(&self) -> Reaction {
        self.reactions.values().fold(Reaction::default(), |acc, r| Reaction {
            fx: acc.fx + r.fx,
            fy: acc.fy + r.fy,
            mz: acc.mz + r.mz,
        })
    }

    /// Largest absolute bending moment over all elements
    pub fn max_bending_moment(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.max_bending_moment())
            .fold(0.0, f64::max)
    }

    /// Largest translation over all analysis points
    pub fn max_displacement(&self) -> f64 {
        self.elements
            .iter()
            .map(|e| e.max_displacement())
            .fold(0.0, f64::max)
    }
}
