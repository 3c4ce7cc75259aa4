//! Internal force recovery from the solved displacements

use nalgebra::DVector;

use crate::error::FrameResult;
use crate::math::{segment_local_stiffness, Vec3, Vec6, GEOMETRY_EPSILON};
use crate::preprocess::PreprocessedElement;
use crate::results::{ElementSolution, PointValue};

/// Displacements and internal forces along one element.
///
/// The local end forces of a segment are `k·d` minus the equivalent actions
/// of the segment's own distributed loads. Every analysis point reports the
/// forces just after it, except the last one which closes the element.
pub fn element_solution(
    element: &PreprocessedElement,
    displacements: &DVector<f64>,
) -> FrameResult<ElementSolution> {
    let frame = element.element.ref_frame();
    let ea = element.element.ea();
    let ei = element.element.ei();
    let area = element.element.section.area;
    let section_modulus = element.element.section.sm_strong;

    let mut solution = ElementSolution::new(element.id());

    let mut local = Vec::with_capacity(element.nodes_count());
    for node in &element.nodes {
        let dofs = node.degrees_of_freedom()?;
        let (dx, dy, rz) = (displacements[dofs[0]], displacements[dofs[1]], displacements[dofs[2]]);
        let [lx, ly] = frame.project_global(dx, dy);

        push_value(&mut solution.global_x_displacement, node.t, dx);
        push_value(&mut solution.global_y_displacement, node.t, dy);
        push_value(&mut solution.local_x_displacement, node.t, lx);
        push_value(&mut solution.local_y_displacement, node.t, ly);
        push_value(&mut solution.z_rotation, node.t, rz);
        local.push(Vec3::new(lx, ly, rz));
    }

    let last_segment = element.segments_count().saturating_sub(1);
    for (i, (trail, lead)) in element.segments().enumerate() {
        let k = segment_local_stiffness(ea, ei, element.segment_length(trail, lead));
        let d = Vec6::new(
            local[i].x,
            local[i].y,
            local[i].z,
            local[i + 1].x,
            local[i + 1].y,
            local[i + 1].z,
        );
        let (own_trail, own_lead) = (trail.actions.right, lead.actions.left);
        let own = Vec6::new(
            own_trail.x,
            own_trail.y,
            own_trail.z,
            own_lead.x,
            own_lead.y,
            own_lead.z,
        );
        let f = k * d - own;

        push_forces(&mut solution, trail.t, -f[0], f[1], -f[2], area, section_modulus);
        if i == last_segment {
            push_forces(&mut solution, lead.t, f[3], -f[4], f[5], area, section_modulus);
        }
    }

    Ok(solution)
}

fn push_forces(
    solution: &mut ElementSolution,
    t: f64,
    axial: f64,
    shear: f64,
    moment: f64,
    area: f64,
    section_modulus: f64,
) {
    push_value(&mut solution.axial_stress, t, axial / area);
    push_value(&mut solution.shear_force, t, shear);
    push_value(&mut solution.bending_moment, t, moment);
    push_value(&mut solution.bending_stress, t, moment / section_modulus);
}

fn push_value(values: &mut Vec<PointValue>, t: f64, value: f64) {
    let is_repeated = values
        .last()
        .is_some_and(|last| (last.t - t).abs() < GEOMETRY_EPSILON);
    if !is_repeated {
        values.push(PointValue::new(t, value));
    }
}
