//! Distributed loads on elements

use serde::{Deserialize, Serialize};

use super::LoadTerm;
use crate::math::{RefFrame, Vec3};

/// Tolerance used when testing whether a range lies inside the load span
const SPAN_TOLERANCE: f64 = 1e-9;

/// A linearly varying load between two positions of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Loaded component
    pub term: LoadTerm,
    /// Whether the load is expressed in the element's local frame
    pub is_local: bool,
    /// Start position parameter
    pub start_t: f64,
    /// Load per unit length at the start position
    pub start_value: f64,
    /// End position parameter
    pub end_t: f64,
    /// Load per unit length at the end position
    pub end_value: f64,
}

impl DistributedLoad {
    /// Create a new distributed load
    pub fn new(
        term: LoadTerm,
        is_local: bool,
        start_t: f64,
        start_value: f64,
        end_t: f64,
        end_value: f64,
    ) -> Self {
        Self {
            term,
            is_local,
            start_t,
            start_value,
            end_t,
            end_value,
        }
    }

    /// Create a uniform load over the full element length
    pub fn uniform(term: LoadTerm, is_local: bool, value: f64) -> Self {
        Self::new(term, is_local, 0.0, value, 1.0, value)
    }

    /// Create a uniform downward load (negative global Y)
    pub fn uniform_downward(magnitude: f64) -> Self {
        Self::uniform(LoadTerm::Fy, false, -magnitude.abs())
    }

    /// Check if the load is uniform (constant magnitude)
    pub fn is_uniform(&self) -> bool {
        (self.start_value - self.end_value).abs() < 1e-10
    }

    /// Check if the load spans the whole element
    pub fn is_full_length(&self) -> bool {
        self.start_t.abs() < SPAN_TOLERANCE && (self.end_t - 1.0).abs() < SPAN_TOLERANCE
    }

    /// Load value at parameter `t`, linearly interpolated.
    /// Zero outside the load span.
    pub fn value_at(&self, t: f64) -> f64 {
        if t < self.start_t - SPAN_TOLERANCE || t > self.end_t + SPAN_TOLERANCE {
            return 0.0;
        }

        let span = self.end_t - self.start_t;
        if span.abs() < SPAN_TOLERANCE {
            return self.start_value;
        }

        let ratio = ((t - self.start_t) / span).clamp(0.0, 1.0);
        self.start_value + ratio * (self.end_value - self.start_value)
    }

    /// Check if the range `[t_start, t_end]` belongs to the load span.
    ///
    /// Slice boundaries coincide with load boundaries, so a range is either
    /// inside or outside the span; its midpoint decides.
    pub fn covers(&self, t_start: f64, t_end: f64) -> bool {
        let mid = 0.5 * (t_start + t_end);
        mid >= self.start_t - SPAN_TOLERANCE && mid <= self.end_t + SPAN_TOLERANCE
    }

    /// `[Fx, Fy, Mz]` of the load at `t`, per unit length, in the element's
    /// local frame. `t` is clamped into the load span.
    pub fn local_components_at(&self, t: f64, frame: &RefFrame) -> Vec3 {
        let t = t.max(self.start_t).min(self.end_t);
        self.term.local_components(self.value_at(t), self.is_local, frame)
    }

    /// Resultant of the load given the element length
    pub fn total_force(&self, element_length: f64) -> f64 {
        let length = (self.end_t - self.start_t) * element_length;
        (self.start_value + self.end_value) / 2.0 * length
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            start_value: self.start_value * factor,
            end_value: self.end_value * factor,
            ..self.clone()
        }
    }
}
