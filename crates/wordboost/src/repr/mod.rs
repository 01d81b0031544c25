//! Canonical model representation: tree nodes, trees and the ensemble.
//!
//! Trees are plain owned values (each subtree exclusively owned by its
//! parent), so an [`Ensemble`] can be cloned, sent across threads and
//! serialized without any shared references.

pub mod ensemble;
pub mod node;
pub mod tree;

pub use ensemble::{Ensemble, EnsembleValidationError};
pub use node::{Branch, Split, SplitType, TreeNode};
pub use tree::{Tree, TreeValidationError};
