//! Element slicing and load distribution
//!
//! Each element is cut into analysis points according to one of three
//! policies. Loads are then turned into nodal actions on those points:
//! concentrated loads act on the point at their position, distributed loads
//! are replaced segment by segment with their consistent nodal actions.

use log::{debug, warn};

use super::{PreprocessedElement, PreprocessedNode};
use crate::elements::Element;
use crate::loads::NODAL_T_TOLERANCE;
use crate::math::{linear_load_nodal_actions, Vec3};

/// Number of segments an unloaded element is cut into
pub const UNLOADED_SEGMENTS: usize = 7;

/// Base number of segments a loaded element is cut into
pub const LOADED_SEGMENTS: usize = 10;

/// Analysis points closer than this (in `t`) are merged
pub const MIN_SEPARATION: f64 = 1e-3;

/// How an element is cut into analysis points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicingPolicy {
    /// Hinged at both ends and loaded only at the ends: just the two ends
    Axial,
    /// No loads: equally spaced points
    Unloaded,
    /// Equally spaced points plus every load discontinuity
    Loaded,
}

impl SlicingPolicy {
    pub fn for_element(element: &Element) -> Self {
        if element.is_axial_member() {
            SlicingPolicy::Axial
        } else if !element.has_loads() {
            SlicingPolicy::Unloaded
        } else {
            SlicingPolicy::Loaded
        }
    }
}

/// Slice an element into analysis points carrying its loads
pub fn slice(element: Element) -> PreprocessedElement {
    let policy = SlicingPolicy::for_element(&element);
    let nodes = match policy {
        SlicingPolicy::Axial => slice_axial(&element),
        SlicingPolicy::Unloaded => slice_unloaded(&element),
        SlicingPolicy::Loaded => slice_at(&element, &slicing_positions(&element)),
    };

    debug!(
        "Element '{}' sliced as {:?} into {} points",
        element.id,
        policy,
        nodes.len()
    );
    PreprocessedElement::new(element, nodes)
}

fn slice_axial(element: &Element) -> Vec<PreprocessedNode> {
    let frame = element.ref_frame();
    let mut nodes = vec![
        PreprocessedNode::new(0.0, element.point_at(0.0)),
        PreprocessedNode::new(1.0, element.point_at(1.0)),
    ];

    for load in &element.concentrated_loads {
        let index = if load.t < 0.5 { 0 } else { 1 };
        nodes[index]
            .actions
            .add_external(&load.local_components(&frame));
    }

    nodes
}

fn slice_unloaded(element: &Element) -> Vec<PreprocessedNode> {
    (0..=UNLOADED_SEGMENTS)
        .map(|i| {
            let t = i as f64 / UNLOADED_SEGMENTS as f64;
            PreprocessedNode::new(t, element.point_at(t))
        })
        .collect()
}

/// Which position survives when two candidates are too close
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Priority {
    Grid,
    Load,
    Extreme,
}

/// Positions of the analysis points of a loaded element.
///
/// The equally spaced grid is merged with the load positions and any two
/// positions closer than [`MIN_SEPARATION`] collapse into one. The element
/// ends always survive, then load positions, then grid positions; among
/// equals the earlier one is kept.
pub fn slicing_positions(element: &Element) -> Vec<f64> {
    let is_inner = |t: f64| t > NODAL_T_TOLERANCE && t < 1.0 - NODAL_T_TOLERANCE;

    let mut candidates: Vec<(f64, Priority)> = (0..=LOADED_SEGMENTS)
        .map(|i| {
            let priority = if i == 0 || i == LOADED_SEGMENTS {
                Priority::Extreme
            } else {
                Priority::Grid
            };
            (i as f64 / LOADED_SEGMENTS as f64, priority)
        })
        .collect();

    candidates.extend(
        element
            .concentrated_loads
            .iter()
            .map(|load| load.t)
            .chain(
                element
                    .distributed_loads
                    .iter()
                    .flat_map(|load| [load.start_t, load.end_t]),
            )
            .filter(|&t| is_inner(t))
            .map(|t| (t, Priority::Load)),
    );
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut kept: Vec<(f64, Priority)> = Vec::with_capacity(candidates.len());
    for (t, priority) in candidates {
        match kept.last_mut() {
            Some(last) if t - last.0 < MIN_SEPARATION => {
                if priority > last.1 {
                    *last = (t, priority);
                }
            }
            _ => kept.push((t, priority)),
        }
    }

    kept.into_iter().map(|(t, _)| t).collect()
}

/// Create analysis points at the given positions and distribute the
/// element's loads onto them. Positions must be sorted and include 0 and 1.
pub fn slice_at(element: &Element, positions: &[f64]) -> Vec<PreprocessedNode> {
    let frame = element.ref_frame();
    let length = element.length();
    let mut nodes: Vec<PreprocessedNode> = positions
        .iter()
        .map(|&t| PreprocessedNode::new(t, element.point_at(t)))
        .collect();

    for load in &element.concentrated_loads {
        let Some(index) = nearest_node(&nodes, load.t) else {
            continue;
        };
        let node = &mut nodes[index];
        if (node.t - load.t).abs() > NODAL_T_TOLERANCE {
            warn!(
                "Element '{}': {} load at t = {} applied at nearest analysis point t = {}",
                element.id, load.term, load.t, node.t
            );
        }
        node.actions.add_external(&load.local_components(&frame));
    }

    let mut covered = vec![false; element.distributed_loads.len()];
    for i in 0..nodes.len().saturating_sub(1) {
        let (t_trail, t_lead) = (nodes[i].t, nodes[i + 1].t);
        let segment_length = (t_lead - t_trail) * length;

        let mut trail = Vec3::zeros();
        let mut lead = Vec3::zeros();
        for (load, covered) in element
            .distributed_loads
            .iter()
            .zip(covered.iter_mut())
            .filter(|(load, _)| load.covers(t_trail, t_lead))
        {
            *covered = true;
            let q_trail = load.local_components_at(t_trail, &frame);
            let q_lead = load.local_components_at(t_lead, &frame);
            let (on_trail, on_lead) = linear_load_nodal_actions(
                (q_trail.x, q_lead.x),
                (q_trail.y, q_lead.y),
                (q_trail.z, q_lead.z),
                segment_length,
            );
            trail += on_trail;
            lead += on_lead;
        }

        nodes[i].actions.add_right(&trail);
        nodes[i + 1].actions.add_left(&lead);
    }

    for (load, _) in element
        .distributed_loads
        .iter()
        .zip(&covered)
        .filter(|(_, &covered)| !covered)
    {
        warn!(
            "Element '{}': distributed {} load over [{}, {}] covers no segment and is ignored",
            element.id, load.term, load.start_t, load.end_t
        );
    }

    nodes
}

fn nearest_node(nodes: &[PreprocessedNode], t: f64) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.t - t).abs().total_cmp(&(b.t - t).abs()))
        .map(|(index, _)| index)
}
