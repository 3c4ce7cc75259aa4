//! Kinematic constraints for nodes and element end links

use serde::{Deserialize, Serialize};

/// Set of displacement components a constraint allows.
///
/// Used both as a node's external support condition and as the link
/// between an element end and its node. For a link, an allowed component
/// is released: the element end gets its own degree of freedom instead of
/// following the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    /// Translation along global X allowed
    pub dx: bool,
    /// Translation along global Y allowed
    pub dy: bool,
    /// Rotation about Z allowed
    pub rz: bool,
}

impl Constraint {
    /// Nothing allowed: a fixed support, or a rigid element connection
    pub const NIL: Constraint = Constraint {
        dx: false,
        dy: false,
        rz: false,
    };

    /// Only rotation allowed: a pinned support, or a hinged element end
    pub const DISPLACEMENT: Constraint = Constraint {
        dx: false,
        dy: false,
        rz: true,
    };

    /// Everything allowed: a free node
    pub const FULL: Constraint = Constraint {
        dx: true,
        dy: true,
        rz: true,
    };

    pub fn new(dx: bool, dy: bool, rz: bool) -> Self {
        Self { dx, dy, rz }
    }

    /// Allowed flags as an array [DX, DY, RZ]
    pub fn allowed(&self) -> [bool; 3] {
        [self.dx, self.dy, self.rz]
    }

    /// Check if any component is restrained
    pub fn is_constrained(&self) -> bool {
        !(self.dx && self.dy && self.rz)
    }

    /// Get list of restrained component indices (0-2)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.allowed()
            .iter()
            .enumerate()
            .filter_map(|(i, &allowed)| if allowed { None } else { Some(i) })
            .collect()
    }

    /// Count number of restrained components
    pub fn num_restrained(&self) -> usize {
        self.restrained_dofs().len()
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::FULL
    }
}
