use thiserror::Error;

/// Structural violations detected while building a taxonomy tree.
///
/// All of these are fatal at build time; a tree that builds successfully
/// upholds every invariant the scoring engine relies on.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("node {key} references unknown parent {parent_key}")]
    UnknownParent { key: String, parent_key: String },

    #[error("duplicate node key {0}")]
    DuplicateKey(String),

    #[error("leaf class index {index} assigned to both {first} and {second}")]
    DuplicateLeafIndex {
        index: usize,
        first: String,
        second: String,
    },

    #[error("leaf {key} has class index {index}, outside 0..{leaf_count}")]
    LeafIndexOutOfRange {
        key: String,
        index: usize,
        leaf_count: usize,
    },

    #[error("node {0} has a leaf class index but also has children")]
    LeafWithChildren(String),

    #[error("{count} nodes unreachable from the root (cycle or orphaned subtree)")]
    UnreachableNode { count: usize },

    #[error("taxonomy has no leaf nodes")]
    NoLeaves,
}
