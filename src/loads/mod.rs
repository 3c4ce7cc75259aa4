//! Element loads: concentrated and linearly distributed

mod concentrated;
mod distributed;

pub use concentrated::{ConcentratedLoad, NODAL_T_TOLERANCE};
pub use distributed::DistributedLoad;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::math::{RefFrame, Vec3};

/// Loaded component of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadTerm {
    /// Force along X (local axis or global X)
    Fx,
    /// Force along Y (local normal or global Y)
    Fy,
    /// Moment about Z
    Mz,
}

impl LoadTerm {
    /// Express a load of this term as `[Fx, Fy, Mz]` in the element's local
    /// frame. Global forces are projected onto the local axes; moments are
    /// frame-invariant.
    pub fn local_components(&self, value: f64, is_local: bool, frame: &RefFrame) -> Vec3 {
        match (self, is_local) {
            (LoadTerm::Mz, _) => Vec3::new(0.0, 0.0, value),
            (LoadTerm::Fx, true) => Vec3::new(value, 0.0, 0.0),
            (LoadTerm::Fy, true) => Vec3::new(0.0, value, 0.0),
            (LoadTerm::Fx, false) => {
                let [x, y] = frame.project_global(value, 0.0);
                Vec3::new(x, y, 0.0)
            }
            (LoadTerm::Fy, false) => {
                let [x, y] = frame.project_global(0.0, value);
                Vec3::new(x, y, 0.0)
            }
        }
    }
}

impl FromStr for LoadTerm {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fx" => Ok(LoadTerm::Fx),
            "fy" => Ok(LoadTerm::Fy),
            "mz" => Ok(LoadTerm::Mz),
            _ => Err(FrameError::UnknownLoadTerm(s.to_string())),
        }
    }
}

impl fmt::Display for LoadTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadTerm::Fx => "fx",
            LoadTerm::Fy => "fy",
            LoadTerm::Mz => "mz",
        };
        write!(f, "{name}")
    }
}
