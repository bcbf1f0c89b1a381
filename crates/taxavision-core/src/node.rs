//! Taxon records and the arena node type.

use serde::{Deserialize, Serialize};

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// A flat taxon record as delivered by taxonomy-file ingestion.
///
/// `parent_key` of `None` (or an empty string) attaches the node directly to
/// the synthetic root. `leaf_class_index` is present exactly on leaf taxa and
/// indexes the classifier's output vector; the full set of leaf indices must
/// be dense over `0..leaf_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub key: String,
    #[serde(default)]
    pub parent_key: Option<String>,
    pub rank_level: f32,
    #[serde(default)]
    pub leaf_class_index: Option<usize>,
    pub name: String,
    /// Geo-model score below which this leaf is not expected nearby.
    #[serde(default)]
    pub spatial_threshold: Option<f32>,
    #[serde(default)]
    pub iconic_id: Option<String>,
    #[serde(default)]
    pub spatial_id: Option<String>,
}

/// A taxon in the built tree.
///
/// Parent and children are arena indices rather than owning pointers, so the
/// tree is a plain `Vec<Node>` with no reference cycles.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: String,
    pub name: String,
    pub rank_level: f32,
    pub leaf_class_index: Option<usize>,
    pub spatial_threshold: Option<f32>,
    pub iconic_id: Option<String>,
    pub spatial_id: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    /// Leaves are exactly the taxa the classifier scores directly.
    pub fn is_leaf(&self) -> bool {
        self.leaf_class_index.is_some()
    }
}
