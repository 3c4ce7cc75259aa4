//! Sparse matrix utilities for the global stiffness system
//!
//! Plane frame stiffness matrices are banded and overwhelmingly sparse, so
//! assembly goes through COO triplets and the solve runs on CSR storage.

use log::{debug, warn};
use nalgebra::{DVector, SMatrix};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CooMatrix, CscMatrix, CsrMatrix};
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Entries below this magnitude are not stored
pub const NEAR_ZERO: f64 = 1e-15;

/// Sparse matrix builder using COO format
/// More efficient for incremental assembly
#[derive(Debug, Clone)]
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // 3 DOFs per analysis point, each coupled to at most two segments
        let estimated_nnz = size * 15;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value.abs() > NEAR_ZERO {
            self.entries.push((row, col, value));
        }
    }

    /// Add values from a small fixed-size matrix
    pub fn add_element_matrix<const N: usize>(&mut self, dofs: &[usize; N], k_elem: &SMatrix<f64, N, N>) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Convert to CSR format for efficient solves. Repeated entries are summed.
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Build a CSR matrix where every DOF in `pinned` has its row and column
    /// zeroed and its diagonal set to one
    pub fn to_csr_pinned(&self, pinned: &[bool]) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            if !pinned[row] && !pinned[col] {
                coo.push(row, col, val);
            }
        }
        for (dof, &is_pinned) in pinned.iter().enumerate() {
            if is_pinned {
                coo.push(dof, dof, 1.0);
            }
        }

        CsrMatrix::from(&coo)
    }

    /// Get estimated non-zero count
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Get sparsity ratio
    pub fn sparsity(&self) -> f64 {
        let total = self.size * self.size;
        if total == 0 {
            return 1.0;
        }
        1.0 - (self.entries.len() as f64 / total as f64)
    }
}

/// Summed diagonal of a CSR matrix
pub fn diagonal(csr: &CsrMatrix<f64>) -> DVector<f64> {
    let mut diag = DVector::zeros(csr.nrows());
    for (row, col, &val) in csr.triplet_iter() {
        if row == col {
            diag[row] += val;
        }
    }
    diag
}

/// Verify the preconditions of the conjugate gradient method: a square,
/// finite, symmetric matrix with a strictly positive diagonal
pub fn check_solvability(csr: &CsrMatrix<f64>, b: &DVector<f64>) -> FrameResult<()> {
    let n = csr.nrows();
    if csr.ncols() != n {
        return Err(FrameError::SafetyCheckFailed(format!(
            "matrix is not square ({} x {})",
            n,
            csr.ncols()
        )));
    }
    if b.len() != n {
        return Err(FrameError::SafetyCheckFailed(format!(
            "load vector has {} entries for a {n}-DOF system",
            b.len()
        )));
    }
    if let Some(i) = b.iter().position(|v| !v.is_finite()) {
        return Err(FrameError::SafetyCheckFailed(format!(
            "load vector entry {i} is not finite"
        )));
    }

    let diag = diagonal(csr);
    for (i, &d) in diag.iter().enumerate() {
        if d <= 0.0 || !d.is_finite() {
            return Err(FrameError::SafetyCheckFailed(format!(
                "diagonal entry {i} is not strictly positive ({d})"
            )));
        }
    }

    let transpose = csr.transpose();
    if csr.row_offsets() != transpose.row_offsets() || csr.col_indices() != transpose.col_indices() {
        return Err(FrameError::SafetyCheckFailed(
            "matrix sparsity pattern is not symmetric".to_string(),
        ));
    }

    for ((row, col, &val), (_, _, &val_t)) in csr.triplet_iter().zip(transpose.triplet_iter()) {
        let scale = val.abs().max(val_t.abs()).max(NEAR_ZERO);
        if (val - val_t).abs() > 1e-9 * scale {
            return Err(FrameError::SafetyCheckFailed(format!(
                "matrix is not symmetric at ({row}, {col}): {val} vs {val_t}"
            )));
        }
    }

    Ok(())
}

/// Outcome of a converged iterative solve
#[derive(Debug, Clone)]
pub struct PcgSolution {
    pub x: DVector<f64>,
    pub iterations: usize,
    pub relative_residual: f64,
}

/// Preconditioner of the conjugate gradient solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preconditioner {
    /// Inverse of the matrix diagonal. Cheap, but frame systems mixing
    /// axial and bending stiffness converge slowly with it.
    Jacobi,
    /// Sparse Cholesky factorization of the whole matrix. Falls back to
    /// Jacobi when the matrix cannot be factorized.
    #[default]
    Cholesky,
}

enum PreconditionerState {
    Jacobi(DVector<f64>),
    Cholesky(CscCholesky<f64>),
}

impl PreconditionerState {
    fn new(kind: Preconditioner, csr: &CsrMatrix<f64>) -> Self {
        match kind {
            Preconditioner::Jacobi => Self::jacobi(csr),
            Preconditioner::Cholesky => match CscCholesky::factor(&CscMatrix::from(csr)) {
                Ok(factor) => Self::Cholesky(factor),
                Err(e) => {
                    warn!("Cholesky factorization failed ({:?}), preconditioning with the diagonal", e);
                    Self::jacobi(csr)
                }
            },
        }
    }

    fn jacobi(csr: &CsrMatrix<f64>) -> Self {
        let mut diag = diagonal(csr);
        for d in diag.iter_mut() {
            if d.abs() < NEAR_ZERO {
                *d = 1.0;
            }
        }
        Self::Jacobi(diag)
    }

    /// z = M^-1 * r
    fn apply(&self, r: &DVector<f64>) -> DVector<f64> {
        match self {
            Self::Jacobi(diag) => r.component_div(diag),
            Self::Cholesky(factor) => factor.solve(r).column(0).into_owned(),
        }
    }
}

/// Solve sparse linear system using Preconditioned Conjugate Gradient
///
/// Iterates until the relative residual `‖r‖ / ‖b‖` drops below `tol` or
/// `max_iter` is exhausted, in which case [`FrameError::ConvergenceFailed`]
/// is returned.
pub fn solve_pcg(
    csr: &CsrMatrix<f64>,
    b: &DVector<f64>,
    preconditioner: Preconditioner,
    tol: f64,
    max_iter: usize,
) -> FrameResult<PcgSolution> {
    let n = csr.nrows();
    let mut x = DVector::zeros(n);

    let b_norm = b.norm();
    if b_norm < NEAR_ZERO {
        return Ok(PcgSolution {
            x,
            iterations: 0,
            relative_residual: 0.0,
        });
    }

    let preconditioner = PreconditionerState::new(preconditioner, csr);

    let mut r = b.clone();
    let mut z = preconditioner.apply(&r);
    let mut p = z.clone();
    let mut r_dot_z = r.dot(&z);
    let mut relative_residual = 1.0;

    for iter in 0..max_iter {
        let ap = sparse_matvec(csr, &p);
        let p_dot_ap = p.dot(&ap);

        // Non-positive curvature: the system is not positive definite
        if p_dot_ap <= 0.0 || !p_dot_ap.is_finite() {
            return Err(FrameError::SolverBreakdown);
        }

        let alpha = r_dot_z / p_dot_ap;

        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        relative_residual = r.norm() / b_norm;
        if relative_residual < tol {
            debug!("PCG converged in {} iterations (residual {relative_residual:e})", iter + 1);
            return Ok(PcgSolution {
                x,
                iterations: iter + 1,
                relative_residual,
            });
        }

        z = preconditioner.apply(&r);
        let r_dot_z_new = r.dot(&z);
        let beta = r_dot_z_new / r_dot_z;
        r_dot_z = r_dot_z_new;

        p = &z + beta * &p;
    }

    Err(FrameError::ConvergenceFailed {
        iterations: max_iter,
        residual: relative_residual,
    })
}

/// Sparse matrix-vector multiplication
#[inline]
pub fn sparse_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = csr.nrows();
    let mut y = DVector::zeros(n);

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    for row in 0..n {
        let start = row_offsets[row];
        let end = row_offsets[row + 1];

        let mut sum = 0.0;
        for idx in start..end {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }

    y
}
