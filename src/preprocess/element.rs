//! Sliced element ready for assembly

use serde::Serialize;

use super::PreprocessedNode;
use crate::elements::Element;
use crate::math::{segment_global_stiffness, Mat6};

/// An element together with its ordered analysis points
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessedElement {
    /// The element as sliced (own weight included if requested)
    pub element: Element,
    /// Analysis points, ordered by increasing `t`
    pub nodes: Vec<PreprocessedNode>,
    /// Global-frame stiffness of every segment between consecutive points
    #[serde(skip)]
    pub stiffness: Vec<Mat6>,
}

impl PreprocessedElement {
    pub fn new(element: Element, nodes: Vec<PreprocessedNode>) -> Self {
        Self {
            element,
            nodes,
            stiffness: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.element.id
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segments_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn first_node(&self) -> Option<&PreprocessedNode> {
        self.nodes.first()
    }

    pub fn last_node(&self) -> Option<&PreprocessedNode> {
        self.nodes.last()
    }

    /// Consecutive `(trail, lead)` point pairs
    pub fn segments(&self) -> impl Iterator<Item = (&PreprocessedNode, &PreprocessedNode)> {
        self.nodes.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Length of the segment between two analysis points
    pub fn segment_length(&self, trail: &PreprocessedNode, lead: &PreprocessedNode) -> f64 {
        (lead.t - trail.t) * self.element.length()
    }

    /// Compute the global stiffness matrix of every segment
    pub fn compute_stiffness(&mut self) {
        let frame = self.element.ref_frame();
        let ea = self.element.ea();
        let ei = self.element.ei();

        let stiffness = self
            .segments()
            .map(|(trail, lead)| {
                let length = self.segment_length(trail, lead);
                segment_global_stiffness(ea, ei, length, &frame)
            })
            .collect();
        self.stiffness = stiffness;
    }
}
