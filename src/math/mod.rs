//! Mathematical utilities for 2D frame calculations

pub mod geometry;
pub mod sparse;

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

pub use geometry::{Point, RefFrame, Segment, GEOMETRY_EPSILON};
pub use sparse::{solve_pcg, Preconditioner, SparseMatrixBuilder};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 6x6 matrix for a two-node plane frame segment
pub type Mat6 = Matrix6<f64>;
/// 6-element vector for segment forces/displacements
pub type Vec6 = Vector6<f64>;

/// Compute the transformation matrix for a plane frame segment
///
/// # Returns
/// 6x6 matrix taking global [DX, DY, RZ] pairs to local ones
pub fn segment_transformation_matrix(frame: &RefFrame) -> Mat6 {
    let (c, s) = (frame.cos, frame.sin);
    let r = Mat3::new(
        c, s, 0.0,
        -s, c, 0.0,
        0.0, 0.0, 1.0,
    );

    let mut t = Mat6::zeros();
    t.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
    t.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
    t
}

/// Compute the local stiffness matrix for a plane Euler-Bernoulli segment
///
/// # Arguments
/// * `ea` - Axial rigidity
/// * `ei` - Flexural rigidity about the strong axis
/// * `length` - Segment length
///
/// # Returns
/// 6x6 local stiffness matrix ordered [u_i, v_i, θ_i, u_j, v_j, θ_j]
pub fn segment_local_stiffness(ea: f64, ei: f64, length: f64) -> Mat6 {
    let l = length;
    let a = ea / l;
    let b = 12.0 * ei / (l * l * l);
    let d = 6.0 * ei / (l * l);
    let e = 4.0 * ei / l;
    let f = 2.0 * ei / l;

    #[rustfmt::skip]
    let data = [
        a,    0.0,  0.0, -a,    0.0,  0.0,
        0.0,  b,    d,    0.0, -b,    d,
        0.0,  d,    e,    0.0, -d,    f,
        -a,   0.0,  0.0,  a,    0.0,  0.0,
        0.0, -b,   -d,    0.0,  b,   -d,
        0.0,  d,    f,    0.0, -d,    e,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the stiffness matrix of a plane segment directly in the global frame
///
/// Equivalent to `Tᵀ · k_local · T`, expanded with the c², s² and cs factors
/// of the segment's direction.
pub fn segment_global_stiffness(ea: f64, ei: f64, length: f64, frame: &RefFrame) -> Mat6 {
    let l = length;
    let (c, s) = (frame.cos, frame.sin);
    let (c2, s2, cs) = (c * c, s * s, c * s);

    let a = ea / l;
    let b = 12.0 * ei / (l * l * l);
    let d = 6.0 * ei / (l * l);
    let e = 4.0 * ei / l;
    let f = 2.0 * ei / l;

    let xx = a * c2 + b * s2;
    let yy = a * s2 + b * c2;
    let xy = (a - b) * cs;
    let ds = d * s;
    let dc = d * c;

    #[rustfmt::skip]
    let data = [
        xx,   xy,  -ds,  -xx,  -xy,  -ds,
        xy,   yy,   dc,  -xy,  -yy,   dc,
        -ds,  dc,   e,    ds,  -dc,   f,
        -xx, -xy,   ds,   xx,   xy,   ds,
        -xy, -yy,  -dc,   xy,   yy,  -dc,
        -ds,  dc,   f,    ds,  -dc,   e,
    ];

    Mat6::from_row_slice(&data)
}

/// Consistent nodal actions for a linearly varying load over a segment
///
/// The load varies from `q_trail` at the trailing node to `q_lead` at the
/// leading node. Returns the `[Fx, Fy, Mz]` actions on the trailing and
/// leading nodes respectively.
///
/// # Arguments
/// * `fx` - Axial load (trail, lead) in the segment's local frame
/// * `fy` - Transverse load (trail, lead) in the segment's local frame
/// * `mz` - Distributed moment (trail, lead)
/// * `length` - Segment length
pub fn linear_load_nodal_actions(
    fx: (f64, f64),
    fy: (f64, f64),
    mz: (f64, f64),
    length: f64,
) -> (Vec3, Vec3) {
    let l = length;
    let l2 = l * l;

    // Axial: linear shape functions
    let fx_trail = l * (2.0 * fx.0 + fx.1) / 6.0;
    let fx_lead = l * (fx.0 + 2.0 * fx.1) / 6.0;

    // Transverse: Hermite shape functions
    let fy_trail = l * (7.0 * fy.0 + 3.0 * fy.1) / 20.0;
    let fy_lead = l * (3.0 * fy.0 + 7.0 * fy.1) / 20.0;
    let mz_trail = l2 * (3.0 * fy.0 + 2.0 * fy.1) / 60.0;
    let mz_lead = -l2 * (2.0 * fy.0 + 3.0 * fy.1) / 60.0;

    // Distributed moment: work-equivalent through the rotation field
    let m_mean = 0.5 * (mz.0 + mz.1);
    let m_slope = (mz.1 - mz.0) * l / 12.0;

    (
        Vec3::new(fx_trail, fy_trail - m_mean, mz_trail - m_slope),
        Vec3::new(fx_lead, fy_lead + m_mean, mz_lead + m_slope),
    )
}
