//! Structure - the plane frame model container

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::elements::{Constraint, Element, ElementBuilder, Material, Node, Section};
use crate::error::{FrameError, FrameResult};

/// Descriptive data attached to a structure and carried into its solution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMetadata {
    /// Major format version
    pub major_version: u32,
    /// Minor format version
    pub minor_version: u32,
    /// Optional structure name
    pub name: Option<String>,
}

impl StructureMetadata {
    pub fn new(major_version: u32, minor_version: u32) -> Self {
        Self {
            major_version,
            minor_version,
            name: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Version formatted as `major.minor`
    pub fn version(&self) -> String {
        format!("{}.{}", self.major_version, self.minor_version)
    }
}

/// The plane frame structure
///
/// Nodes, materials and sections are shared with elements by reference;
/// elements keep their insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Structure {
    /// Descriptive data
    pub metadata: StructureMetadata,
    /// Nodes by id
    pub nodes: HashMap<String, Arc<Node>>,
    /// Materials by name
    pub materials: HashMap<String, Arc<Material>>,
    /// Sections by name
    pub sections: HashMap<String, Arc<Section>>,
    /// Elements in insertion order
    pub elements: Vec<Element>,
}

impl Structure {
    /// Create a new empty structure
    pub fn new(metadata: StructureMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the structure
    pub fn add_node(&mut self, node: Node) -> FrameResult<Arc<Node>> {
        if self.nodes.contains_key(&node.id) {
            return Err(FrameError::DuplicateName(node.id));
        }
        let node = Arc::new(node);
        self.nodes.insert(node.id.clone(), Arc::clone(&node));
        Ok(node)
    }

    /// Add a material to the structure
    pub fn add_material(&mut self, material: Material) -> FrameResult<Arc<Material>> {
        material.validate()?;
        if self.materials.contains_key(&material.name) {
            return Err(FrameError::DuplicateName(material.name));
        }
        let material = Arc::new(material);
        self.materials
            .insert(material.name.clone(), Arc::clone(&material));
        Ok(material)
    }

    /// Add a section to the structure
    pub fn add_section(&mut self, section: Section) -> FrameResult<Arc<Section>> {
        section.validate()?;
        if self.sections.contains_key(&section.name) {
            return Err(FrameError::DuplicateName(section.name));
        }
        let section = Arc::new(section);
        self.sections.insert(section.name.clone(), Arc::clone(&section));
        Ok(section)
    }

    /// Add an element to the structure
    ///
    /// Its nodes, material and section must already be part of the structure.
    pub fn add_element(&mut self, element: Element) -> FrameResult<()> {
        for node in [&element.start_node, &element.end_node] {
            match self.nodes.get(&node.id) {
                Some(known) if Arc::ptr_eq(known, node) || **known == **node => {}
                _ => return Err(FrameError::NodeNotFound(node.id.clone())),
            }
        }
        if !self.materials.contains_key(&element.material.name) {
            return Err(FrameError::MaterialNotFound(element.material.name.clone()));
        }
        if !self.sections.contains_key(&element.section.name) {
            return Err(FrameError::SectionNotFound(element.section.name.clone()));
        }
        if self.elements.iter().any(|e| e.id == element.id) {
            return Err(FrameError::DuplicateName(element.id));
        }

        self.elements.push(element);
        Ok(())
    }

    /// Start an element builder already wired to the named nodes, material
    /// and section of this structure. Links default to rigid connections.
    pub fn element_builder(
        &self,
        id: &str,
        start: &str,
        end: &str,
        material: &str,
        section: &str,
    ) -> FrameResult<ElementBuilder> {
        Ok(ElementBuilder::new(id)
            .with_start_node(self.node(start)?, Constraint::NIL)
            .with_end_node(self.node(end)?, Constraint::NIL)
            .with_material(self.material(material)?)
            .with_section(self.section(section)?))
    }

    // ========================
    // Lookup Methods
    // ========================

    pub fn node(&self, id: &str) -> FrameResult<Arc<Node>> {
        self.nodes
            .get(id)
            .cloned()
            .ok_or_else(|| FrameError::NodeNotFound(id.to_string()))
    }

    pub fn material(&self, name: &str) -> FrameResult<Arc<Material>> {
        self.materials
            .get(name)
            .cloned()
            .ok_or_else(|| FrameError::MaterialNotFound(name.to_string()))
    }

    pub fn section(&self, name: &str) -> FrameResult<Arc<Section>> {
        self.sections
            .get(name)
            .cloned()
            .ok_or_else(|| FrameError::SectionNotFound(name.to_string()))
    }

    pub fn element(&self, id: &str) -> FrameResult<&Element> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| FrameError::ElementNotFound(id.to_string()))
    }

    // ========================
    // Statistics
    // ========================

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn elements_count(&self) -> usize {
        self.elements.len()
    }

    /// Nodes with any external restraint
    pub fn constrained_nodes(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.nodes.values().filter(|node| node.is_constrained())
    }
}
