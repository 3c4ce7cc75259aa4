//! Preprocessing: slice every element into analysis points
//!
//! Elements are independent of each other, so they are sliced in parallel.
//! The returned collection is complete before any later stage starts.

mod element;
mod node;
pub mod slice;

pub use element::PreprocessedElement;
pub use node::{NodalActions, PreprocessedNode};
pub use slice::{slice, SlicingPolicy};

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::Structure;

/// Options for preprocessing a structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessOptions {
    /// Add each element's own weight as a uniform downward load
    pub include_own_weight: bool,
}

/// Slice all elements of a structure, in insertion order
pub fn preprocess(structure: &Structure, options: &PreprocessOptions) -> Vec<PreprocessedElement> {
    let elements: Vec<PreprocessedElement> = structure
        .elements
        .par_iter()
        .map(|element| {
            if options.include_own_weight {
                slice(element.with_own_weight())
            } else {
                slice(element.clone())
            }
        })
        .collect();

    let points: usize = elements.iter().map(|e| e.nodes_count()).sum();
    info!(
        "Preprocessed {} elements into {} analysis points",
        elements.len(),
        points
    );
    elements
}
