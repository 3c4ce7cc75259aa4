//! Degree of freedom numbering

use std::collections::HashMap;

use log::info;

use crate::elements::Constraint;
use crate::error::{FrameError, FrameResult};
use crate::preprocess::PreprocessedElement;

/// DOF numbers of the structural nodes and the size of the system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DofMap {
    node_dofs: HashMap<String, [usize; 3]>,
    dof_count: usize,
}

impl DofMap {
    /// `[DX, DY, RZ]` DOF numbers of a structural node
    pub fn node_dofs(&self, node_id: &str) -> Option<[usize; 3]> {
        self.node_dofs.get(node_id).copied()
    }

    /// Total number of DOFs in the system
    pub fn dof_count(&self) -> usize {
        self.dof_count
    }

    /// Structural nodes with their DOF numbers
    pub fn nodes(&self) -> impl Iterator<Item = (&str, [usize; 3])> {
        self.node_dofs.iter().map(|(id, dofs)| (id.as_str(), *dofs))
    }

    fn next_triple(&mut self) -> [usize; 3] {
        let first = self.dof_count;
        self.dof_count += 3;
        [first, first + 1, first + 2]
    }

    fn structural_node(&mut self, node_id: &str) -> [usize; 3] {
        if let Some(dofs) = self.node_dofs.get(node_id) {
            return *dofs;
        }
        let dofs = self.next_triple();
        self.node_dofs.insert(node_id.to_string(), dofs);
        dofs
    }

    /// DOFs of an element end: components the link releases get their own
    /// number, the others follow the node
    fn element_end(&mut self, node_dofs: [usize; 3], link: Constraint) -> [usize; 3] {
        let mut dofs = node_dofs;
        for (dof, allowed) in dofs.iter_mut().zip(link.allowed()) {
            if allowed {
                *dof = self.dof_count;
                self.dof_count += 1;
            }
        }
        dofs
    }
}

/// Number the DOFs of every analysis point.
///
/// Elements are first sorted by geometry so numbering does not depend on the
/// order they were defined in. Structural nodes get a DOF triple the first
/// time an element reaches them; interior analysis points always get their
/// own triple.
pub fn assign_dofs(elements: &mut [PreprocessedElement]) -> FrameResult<DofMap> {
    elements.sort_by(|a, b| {
        a.element
            .geometry()
            .canonical_cmp(&b.element.geometry())
            .then_with(|| a.id().cmp(b.id()))
    });

    let mut map = DofMap::default();
    for element in elements.iter_mut() {
        if element.nodes.len() < 2 {
            return Err(FrameError::InvalidInput(format!(
                "element '{}' has {} analysis points, at least 2 required",
                element.element.id,
                element.nodes.len()
            )));
        }

        let start_dofs = map.structural_node(&element.element.start_node.id);
        let start = map.element_end(start_dofs, element.element.start_link);

        let last = element.nodes.len() - 1;
        element.nodes[0].dofs = Some(start);
        for node in &mut element.nodes[1..last] {
            node.dofs = Some(map.next_triple());
        }

        let end_dofs = map.structural_node(&element.element.end_node.id);
        let end = map.element_end(end_dofs, element.element.end_link);
        element.nodes[last].dofs = Some(end);
    }

    info!(
        "Assigned {} DOFs to {} structural nodes",
        map.dof_count,
        map.node_dofs.len()
    );
    Ok(map)
}
