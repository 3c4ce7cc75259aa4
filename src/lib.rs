//! Frame Solver - linear static analysis of plane frames and trusses
//!
//! Structures made of straight elements are analysed with the direct
//! stiffness method:
//! - Elements are sliced into analysis points and their loads replaced by
//!   consistent nodal actions
//! - DOFs are numbered deterministically, honouring node sharing and
//!   released element ends
//! - The global sparse system is solved with a preconditioned conjugate
//!   gradient (sparse Cholesky by default, Jacobi on request)
//! - Displacements, axial stress, shear and bending moment are recovered
//!   along every element
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! # fn main() -> FrameResult<()> {
//! let mut structure = Structure::new(StructureMetadata::new(1, 0));
//!
//! structure.add_material(Material::steel("S275"))?;
//! structure.add_section(Section::rectangular("R200x100", 0.1, 0.2))?;
//!
//! structure.add_node(Node::fixed("A", 0.0, 0.0))?;
//! structure.add_node(Node::new("B", 3.0, 0.0))?;
//!
//! let beam = structure
//!     .element_builder("AB", "A", "B", "S275", "R200x100")?
//!     .add_concentrated_load(ConcentratedLoad::global(LoadTerm::Fy, 1.0, -10e3))
//!     .build()?;
//! structure.add_element(beam)?;
//!
//! let solution = solve(&structure, &SolveOptions::default())?;
//!
//! let tip = solution.node_displacement("B")?;
//! assert!(tip.dy < 0.0);
//! let support = solution.reaction("A")?;
//! assert!((support.fy - 10e3).abs() < 1.0);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod dump;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod preprocess;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{solve, SolveOptions};
    pub use crate::elements::{Constraint, Element, ElementBuilder, Material, Node, Section};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::math::Preconditioner;
    pub use crate::loads::{ConcentratedLoad, DistributedLoad, LoadTerm};
    pub use crate::model::{Structure, StructureMetadata};
    pub use crate::preprocess::{preprocess, PreprocessOptions};
    pub use crate::results::{ElementSolution, NodeDisplacement, PointValue, Reaction, Solution};
}
