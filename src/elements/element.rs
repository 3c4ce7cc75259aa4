//! Element - a straight plane frame member between two nodes

use std::sync::Arc;

use serde::Serialize;

use super::{Constraint, Material, Node, Section};
use crate::error::{FrameError, FrameResult};
use crate::loads::{ConcentratedLoad, DistributedLoad, LoadTerm};
use crate::math::{Point, RefFrame, Segment, GEOMETRY_EPSILON};
use crate::preprocess::slice::MIN_SEPARATION;

/// A plane frame element (beam, column or truss bar)
///
/// Built through [`ElementBuilder`], which validates the configuration.
/// Nodes, material and section are shared with the enclosing structure.
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    /// Unique identifier
    pub id: String,
    /// Start node
    pub start_node: Arc<Node>,
    /// How the element's start is coupled to its node
    pub start_link: Constraint,
    /// End node
    pub end_node: Arc<Node>,
    /// How the element's end is coupled to its node
    pub end_link: Constraint,
    /// Material
    pub material: Arc<Material>,
    /// Cross section
    pub section: Arc<Section>,
    /// Concentrated loads
    pub concentrated_loads: Vec<ConcentratedLoad>,
    /// Distributed loads
    pub distributed_loads: Vec<DistributedLoad>,
}

impl Element {
    /// Straight segment from the start to the end node
    pub fn geometry(&self) -> Segment {
        Segment::new(self.start_node.position, self.end_node.position)
    }

    /// Element length
    pub fn length(&self) -> f64 {
        self.geometry().length()
    }

    /// Local reference frame (direction and normal unit vectors)
    pub fn ref_frame(&self) -> RefFrame {
        self.geometry().ref_frame()
    }

    /// Point at parameter `t`
    pub fn point_at(&self, t: f64) -> Point {
        self.geometry().point_at(t)
    }

    /// Axial rigidity E·A
    pub fn ea(&self) -> f64 {
        self.material.young_mod * self.section.area
    }

    /// Flexural rigidity E·I about the strong axis
    pub fn ei(&self) -> f64 {
        self.material.young_mod * self.section.i_strong
    }

    /// Check if any load is applied to the element
    pub fn has_loads(&self) -> bool {
        !self.concentrated_loads.is_empty() || !self.distributed_loads.is_empty()
    }

    /// Check if the element only carries axial load: both ends hinged,
    /// no distributed loads and only end-applied forces.
    pub fn is_axial_member(&self) -> bool {
        self.start_link.rz
            && self.end_link.rz
            && self.distributed_loads.is_empty()
            && self
                .concentrated_loads
                .iter()
                .all(|load| load.is_nodal() && !load.is_moment())
    }

    /// Copy of this element carrying its own weight as an extra uniform
    /// load along global -Y
    pub fn with_own_weight(&self) -> Element {
        let weight = self.material.density * self.section.area;
        let mut element = self.clone();
        element
            .distributed_loads
            .push(DistributedLoad::uniform(LoadTerm::Fy, false, -weight));
        element
    }
}

/// Fluent builder for [`Element`]
#[derive(Debug, Clone, Default)]
pub struct ElementBuilder {
    id: String,
    start_node: Option<Arc<Node>>,
    start_link: Constraint,
    end_node: Option<Arc<Node>>,
    end_link: Constraint,
    material: Option<Arc<Material>>,
    section: Option<Arc<Section>>,
    concentrated_loads: Vec<ConcentratedLoad>,
    distributed_loads: Vec<DistributedLoad>,
}

impl ElementBuilder {
    /// New builder; links default to rigid connections
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            start_link: Constraint::NIL,
            end_link: Constraint::NIL,
            ..Self::default()
        }
    }

    /// Set the start node and the link coupling the element to it
    pub fn with_start_node(mut self, node: Arc<Node>, link: Constraint) -> Self {
        self.start_node = Some(node);
        self.start_link = link;
        self
    }

    /// Set the end node and the link coupling the element to it
    pub fn with_end_node(mut self, node: Arc<Node>, link: Constraint) -> Self {
        self.end_node = Some(node);
        self.end_link = link;
        self
    }

    /// Replace both end links
    pub fn with_links(mut self, start_link: Constraint, end_link: Constraint) -> Self {
        self.start_link = start_link;
        self.end_link = end_link;
        self
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_section(mut self, section: Arc<Section>) -> Self {
        self.section = Some(section);
        self
    }

    pub fn add_concentrated_load(mut self, load: ConcentratedLoad) -> Self {
        self.concentrated_loads.push(load);
        self
    }

    pub fn add_distributed_load(mut self, load: DistributedLoad) -> Self {
        self.distributed_loads.push(load);
        self
    }

    /// Validate and build the element
    pub fn build(self) -> FrameResult<Element> {
        let id = self.id;
        let start_node = self
            .start_node
            .ok_or_else(|| FrameError::MissingStartNode(id.clone()))?;
        let end_node = self
            .end_node
            .ok_or_else(|| FrameError::MissingEndNode(id.clone()))?;
        let material = self
            .material
            .ok_or_else(|| FrameError::MissingMaterial(id.clone()))?;
        let section = self
            .section
            .ok_or_else(|| FrameError::MissingSection(id.clone()))?;

        material.validate()?;
        section.validate()?;

        if start_node.distance_to(&end_node) < GEOMETRY_EPSILON {
            return Err(FrameError::InvalidGeometry(format!(
                "element '{}' has zero length ('{}' and '{}' coincide)",
                id, start_node.id, end_node.id
            )));
        }

        for load in &self.concentrated_loads {
            validate_concentrated(&id, load)?;
        }
        for load in &self.distributed_loads {
            validate_distributed(&id, load)?;
        }

        Ok(Element {
            id,
            start_node,
            start_link: self.start_link,
            end_node,
            end_link: self.end_link,
            material,
            section,
            concentrated_loads: self.concentrated_loads,
            distributed_loads: self.distributed_loads,
        })
    }
}

fn invalid_load(element: &str, reason: String) -> FrameError {
    FrameError::InvalidLoad {
        element: element.to_string(),
        reason,
    }
}

fn validate_concentrated(element: &str, load: &ConcentratedLoad) -> FrameResult<()> {
    if !(0.0..=1.0).contains(&load.t) {
        return Err(invalid_load(
            element,
            format!("concentrated {} load at t = {} outside [0, 1]", load.term, load.t),
        ));
    }
    if !load.value.is_finite() {
        return Err(invalid_load(
            element,
            format!("concentrated {} load at t = {} is not finite", load.term, load.t),
        ));
    }
    Ok(())
}

fn validate_distributed(element: &str, load: &DistributedLoad) -> FrameResult<()> {
    let in_range = |t: f64| (0.0..=1.0).contains(&t);
    if !in_range(load.start_t) || !in_range(load.end_t) {
        return Err(invalid_load(
            element,
            format!(
                "distributed {} load span [{}, {}] outside [0, 1]",
                load.term, load.start_t, load.end_t
            ),
        ));
    }
    if load.start_t >= load.end_t {
        return Err(invalid_load(
            element,
            format!(
                "distributed {} load starts at t = {} but ends at t = {}",
                load.term, load.start_t, load.end_t
            ),
        ));
    }
    // Shorter spans would collapse onto a single analysis point
    if load.end_t - load.start_t < MIN_SEPARATION {
        return Err(invalid_load(
            element,
            format!(
                "distributed {} load span [{}, {}] is shorter than {}",
                load.term, load.start_t, load.end_t, MIN_SEPARATION
            ),
        ));
    }
    if !load.start_value.is_finite() || !load.end_value.is_finite() {
        return Err(invalid_load(
            element,
            format!("distributed {} load value is not finite", load.term),
        ));
    }
    Ok(())
}
