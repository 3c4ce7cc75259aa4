//! Linear static analysis: options and the solve pipeline
//!
//! Stages, in order: slicing (parallel per element), DOF numbering,
//! stiffness computation (parallel per element), assembly, constraint
//! enforcement, the PCG solve, then reactions and stress recovery
//! (parallel per element).

pub mod assembly;
pub mod dofs;
pub mod stress;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dump;
use crate::error::FrameResult;
use crate::math::sparse::{check_solvability, solve_pcg, Preconditioner};
use crate::model::Structure;
use crate::preprocess::{preprocess, PreprocessOptions};
use crate::results::{NodeDisplacement, Reaction, Solution};

pub use dofs::{assign_dofs, DofMap};

/// Options for solving a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Add each element's own weight as a uniform downward load
    pub include_own_weight: bool,
    /// Relative residual the solver must reach
    pub max_displacement_error: f64,
    /// Solver iteration budget (None = system size)
    pub max_iterations: Option<usize>,
    /// Preconditioner of the conjugate gradient solver
    pub preconditioner: Preconditioner,
    /// Verify the system is solvable before solving
    pub safety_checks: bool,
    /// Write the sparsity pattern of the system matrix as a PBM image
    pub dump_matrix: Option<PathBuf>,
    /// Write the preprocessed structure as JSON
    pub dump_preprocessed: Option<PathBuf>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            include_own_weight: false,
            max_displacement_error: 1e-5,
            max_iterations: None,
            preconditioner: Preconditioner::default(),
            safety_checks: false,
            dump_matrix: None,
            dump_preprocessed: None,
        }
    }
}

impl SolveOptions {
    /// Include own weight
    pub fn with_own_weight(mut self) -> Self {
        self.include_own_weight = true;
        self
    }

    /// Set the solver tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.max_displacement_error = tol;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }

    /// Set the solver preconditioner
    pub fn with_preconditioner(mut self, preconditioner: Preconditioner) -> Self {
        self.preconditioner = preconditioner;
        self
    }

    /// Enable the pre-solve safety checks
    pub fn with_safety_checks(mut self) -> Self {
        self.safety_checks = true;
        self
    }

    pub fn with_matrix_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_matrix = Some(path.into());
        self
    }

    pub fn with_preprocessed_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump_preprocessed = Some(path.into());
        self
    }

    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            include_own_weight: self.include_own_weight,
        }
    }
}

/// Solve a structure
pub fn solve(structure: &Structure, options: &SolveOptions) -> FrameResult<Solution> {
    let start = Instant::now();

    let mut elements = preprocess(structure, &options.preprocess_options());
    let dof_map = assign_dofs(&mut elements)?;
    let dof_count = dof_map.dof_count();

    if let Some(path) = &options.dump_preprocessed {
        dump::write_preprocessed(path, &structure.metadata, &elements)?;
    }

    assembly::compute_stiffness(&mut elements);
    let system = assembly::assemble(&elements, dof_count)?;
    let unconstrained = system.unconstrained_matrix();

    let restrained = assembly::restrained_dofs(structure, &dof_map);
    let orphans = assembly::orphan_dofs(&unconstrained);
    let pinned: Vec<bool> = restrained
        .iter()
        .zip(&orphans)
        .map(|(&restrained, &orphan)| restrained || orphan)
        .collect();
    let (matrix, loads) = system.constrained(&pinned);

    if let Some(path) = &options.dump_matrix {
        dump::write_matrix_image(path, &matrix)?;
    }
    if options.safety_checks {
        check_solvability(&matrix, &loads)?;
    }

    let max_iterations = options.max_iterations.unwrap_or(dof_count);
    let pcg = solve_pcg(
        &matrix,
        &loads,
        options.preconditioner,
        options.max_displacement_error,
        max_iterations,
    )?;
    info!(
        "Solved {} DOFs in {} iterations (relative residual {:e})",
        dof_count, pcg.iterations, pcg.relative_residual
    );

    let residuals = assembly::reactions(&unconstrained, &system.loads, &pcg.x);
    let mut reactions = BTreeMap::new();
    for node in structure.constrained_nodes() {
        let Some(dofs) = dof_map.node_dofs(&node.id) else {
            continue;
        };
        let mut reaction = [0.0; 3];
        for ((value, &dof), allowed) in reaction.iter_mut().zip(&dofs).zip(node.constraint.allowed()) {
            if !allowed {
                *value = residuals[dof];
            }
        }
        reactions.insert(node.id.clone(), Reaction::from_array(reaction));
    }

    let node_displacements: BTreeMap<String, NodeDisplacement> = dof_map
        .nodes()
        .map(|(id, dofs)| {
            let displacement = NodeDisplacement::from_array(dofs.map(|dof| pcg.x[dof]));
            (id.to_string(), displacement)
        })
        .collect();

    let element_solutions = elements
        .par_iter()
        .map(|element| stress::element_solution(element, &pcg.x))
        .collect::<FrameResult<Vec<_>>>()?;

    info!(
        "Solved structure with {} elements in {:.3}s",
        element_solutions.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(Solution {
        metadata: structure.metadata.clone(),
        dof_count,
        iterations: pcg.iterations,
        elements: element_solutions,
        node_displacements,
        reactions,
    })
}
