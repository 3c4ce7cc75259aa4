//! Structural entities module

mod constraint;
mod element;
mod material;
mod node;
mod section;

pub use constraint::Constraint;
pub use element::{Element, ElementBuilder};
pub use material::Material;
pub use node::Node;
pub use section::Section;
