//! Analysis points produced by slicing an element

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::math::{Point, Vec3};

/// Nodal actions `[Fx, Fy, Mz]` accumulated on an analysis point, in the
/// element's local frame
///
/// Kept split by origin: loads applied directly on the point, and the
/// equivalent actions of the distributed loads acting on the segment to its
/// left and to its right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodalActions {
    /// Concentrated loads applied on the point
    pub external: Vec3,
    /// Contribution of the segment ending at the point
    pub left: Vec3,
    /// Contribution of the segment starting at the point
    pub right: Vec3,
}

impl NodalActions {
    /// Net action on the point
    pub fn net(&self) -> Vec3 {
        self.external + self.left + self.right
    }

    pub fn add_external(&mut self, actions: &Vec3) {
        self.external += actions;
    }

    pub fn add_left(&mut self, actions: &Vec3) {
        self.left += actions;
    }

    pub fn add_right(&mut self, actions: &Vec3) {
        self.right += actions;
    }
}

/// A point of a sliced element where displacements are computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedNode {
    /// Position parameter along the element
    pub t: f64,
    /// Position in global coordinates
    pub position: Point,
    /// Accumulated local nodal actions
    pub actions: NodalActions,
    /// Global DOF numbers `[DX, DY, RZ]`, once assigned
    pub dofs: Option<[usize; 3]>,
}

impl PreprocessedNode {
    pub fn new(t: f64, position: Point) -> Self {
        Self {
            t,
            position,
            actions: NodalActions::default(),
            dofs: None,
        }
    }

    /// Net local `[Fx, Fy, Mz]` on the point
    pub fn net_actions(&self) -> Vec3 {
        self.actions.net()
    }

    /// Assigned DOF numbers, or an error if DOFs were never assigned
    pub fn degrees_of_freedom(&self) -> FrameResult<[usize; 3]> {
        self.dofs.ok_or_else(|| {
            FrameError::InvalidInput(format!(
                "analysis point at t = {} ({}, {}) has no degrees of freedom assigned",
                self.t, self.position.x, self.position.y
            ))
        })
    }
}
