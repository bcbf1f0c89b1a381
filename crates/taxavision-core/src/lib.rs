//! Immutable taxonomy model shared by every inference call.

pub mod error;
pub mod node;
pub mod rank;
pub mod tree;

pub use error::TaxonomyError;
pub use node::{Node, NodeId, NodeRecord};
pub use rank::rank_name;
pub use tree::{ROOT_KEY, TaxonomyTree};
