//! Node - a structural joint in the XY plane

use serde::{Deserialize, Serialize};

use super::Constraint;
use crate::math::Point;

/// A structural node in the plane frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: String,
    /// Position in global coordinates
    pub position: Point,
    /// External support condition
    pub constraint: Constraint,
}

impl Node {
    /// Create a new free node at the given coordinates
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            position: Point::new(x, y),
            constraint: Constraint::FULL,
        }
    }

    /// Set the external constraint
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Fixed support: no displacement nor rotation
    pub fn fixed(id: &str, x: f64, y: f64) -> Self {
        Self::new(id, x, y).with_constraint(Constraint::NIL)
    }

    /// Pinned support: rotation only
    pub fn pinned(id: &str, x: f64, y: f64) -> Self {
        Self::new(id, x, y).with_constraint(Constraint::DISPLACEMENT)
    }

    /// Check if the node has any external restraint
    pub fn is_constrained(&self) -> bool {
        self.constraint.is_constrained()
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        self.position.distance_to(&other.position)
    }
}
