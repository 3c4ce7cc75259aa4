//! Global system assembly
//!
//! Segment stiffness matrices are computed per element in parallel, then
//! scattered into a single sparse builder sequentially. Support constraints
//! are enforced by pinning DOFs: their rows and columns are cleared, the
//! diagonal set to one and the load zeroed, so the system keeps its size.

use log::{debug, info, warn};
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use rayon::prelude::*;

use super::dofs::DofMap;
use crate::error::{FrameError, FrameResult};
use crate::math::sparse::{diagonal, sparse_matvec, NEAR_ZERO};
use crate::math::SparseMatrixBuilder;
use crate::model::Structure;
use crate::preprocess::PreprocessedElement;

/// Global stiffness matrix and load vector, before constraints
#[derive(Debug, Clone)]
pub struct GlobalSystem {
    pub stiffness: SparseMatrixBuilder,
    pub loads: DVector<f64>,
}

impl GlobalSystem {
    pub fn size(&self) -> usize {
        self.loads.len()
    }

    /// Stiffness matrix without constraints
    pub fn unconstrained_matrix(&self) -> CsrMatrix<f64> {
        self.stiffness.to_csr()
    }

    /// Matrix and load vector with every DOF flagged in `pinned` held at zero
    pub fn constrained(&self, pinned: &[bool]) -> (CsrMatrix<f64>, DVector<f64>) {
        let matrix = self.stiffness.to_csr_pinned(pinned);
        let mut loads = self.loads.clone();
        for (dof, &is_pinned) in pinned.iter().enumerate() {
            if is_pinned {
                loads[dof] = 0.0;
            }
        }
        (matrix, loads)
    }
}

/// Compute the segment stiffness matrices of every element
pub fn compute_stiffness(elements: &mut [PreprocessedElement]) {
    elements
        .par_iter_mut()
        .for_each(|element| element.compute_stiffness());
}

/// Assemble the global stiffness matrix and load vector
pub fn assemble(elements: &[PreprocessedElement], dof_count: usize) -> FrameResult<GlobalSystem> {
    let mut stiffness = SparseMatrixBuilder::new(dof_count);
    let mut loads = DVector::zeros(dof_count);

    for element in elements {
        if element.stiffness.len() != element.segments_count() {
            return Err(FrameError::InvalidInput(format!(
                "element '{}' has {} stiffness matrices for {} segments",
                element.id(),
                element.stiffness.len(),
                element.segments_count()
            )));
        }

        for ((trail, lead), k) in element.segments().zip(&element.stiffness) {
            let t = trail.degrees_of_freedom()?;
            let l = lead.degrees_of_freedom()?;
            stiffness.add_element_matrix(&[t[0], t[1], t[2], l[0], l[1], l[2]], k);
        }

        let frame = element.element.ref_frame();
        for node in &element.nodes {
            let dofs = node.degrees_of_freedom()?;
            let net = node.net_actions();
            let [fx, fy] = frame.to_global(net.x, net.y);
            loads[dofs[0]] += fx;
            loads[dofs[1]] += fy;
            loads[dofs[2]] += net.z;
        }
    }

    info!(
        "Assembled {} DOFs with {} stiffness entries ({:.2}% sparse)",
        dof_count,
        stiffness.nnz(),
        stiffness.sparsity() * 100.0
    );
    Ok(GlobalSystem { stiffness, loads })
}

/// DOFs restrained by the external constraints of the structure's nodes
pub fn restrained_dofs(structure: &Structure, dofs: &DofMap) -> Vec<bool> {
    let mut restrained = vec![false; dofs.dof_count()];

    for node in structure.constrained_nodes() {
        let Some(node_dofs) = dofs.node_dofs(&node.id) else {
            warn!("Constrained node '{}' is not connected to any element", node.id);
            continue;
        };
        for (dof, allowed) in node_dofs.iter().zip(node.constraint.allowed()) {
            if !allowed {
                restrained[*dof] = true;
            }
        }
    }

    restrained
}

/// DOFs no element is coupled to, e.g. the rotation of a node all of whose
/// elements are hinged. Their rows are empty.
pub fn orphan_dofs(matrix: &CsrMatrix<f64>) -> Vec<bool> {
    let orphans: Vec<bool> = diagonal(matrix)
        .iter()
        .map(|d| d.abs() <= NEAR_ZERO)
        .collect();

    let count = orphans.iter().filter(|&&orphan| orphan).count();
    if count > 0 {
        debug!("{} DOFs are not coupled to any element and are held at zero", count);
    }
    orphans
}

/// Reaction forces `K·d − F` on the unconstrained system
pub fn reactions(matrix: &CsrMatrix<f64>, loads: &DVector<f64>, displacements: &DVector<f64>) -> DVector<f64> {
    sparse_matvec(matrix, displacements) - loads
}
