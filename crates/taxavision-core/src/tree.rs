//! Arena-backed taxonomy tree.
//!
//! Built once from a flat record list, then immutable. Nodes live in a single
//! `Vec` and address each other by index, so the tree is `Send + Sync` and
//! any number of concurrent inference calls can share a `&TaxonomyTree`.

use std::collections::HashMap;

use tracing::info;

use crate::error::TaxonomyError;
use crate::node::{Node, NodeId, NodeRecord};

/// Key of the synthetic root taxon ("Life").
pub const ROOT_KEY: &str = "48460";

/// Rank level of the synthetic root.
pub const ROOT_RANK_LEVEL: f32 = 100.0;

const ROOT_ID: NodeId = 0;

/// The static taxonomy: every taxon the model knows, linked parent to child.
///
/// The synthetic root is created by [`TaxonomyTree::build`] itself; input
/// records never include it. Records with no parent key attach to the root.
#[derive(Debug)]
pub struct TaxonomyTree {
    nodes: Vec<Node>,
    by_key: HashMap<String, NodeId>,
    leaves: Vec<NodeId>,
}

impl TaxonomyTree {
    /// Build and validate a tree from parsed taxonomy records.
    ///
    /// Fails when a parent key does not resolve, a key or leaf class index is
    /// duplicated, a leaf class index falls outside the dense `0..leaf_count`
    /// range, a node carries both a leaf class index and children, or any
    /// node is unreachable from the root.
    pub fn build(records: Vec<NodeRecord>) -> Result<Self, TaxonomyError> {
        let mut by_key: HashMap<String, NodeId> = HashMap::with_capacity(records.len() + 1);
        by_key.insert(ROOT_KEY.to_string(), ROOT_ID);
        for (i, record) in records.iter().enumerate() {
            if by_key.insert(record.key.clone(), i + 1).is_some() {
                return Err(TaxonomyError::DuplicateKey(record.key.clone()));
            }
        }

        let mut nodes = Vec::with_capacity(records.len() + 1);
        nodes.push(Node {
            key: ROOT_KEY.to_string(),
            name: "Life".to_string(),
            rank_level: ROOT_RANK_LEVEL,
            leaf_class_index: None,
            spatial_threshold: None,
            iconic_id: None,
            spatial_id: None,
            parent: None,
            children: Vec::new(),
        });
        for record in &records {
            nodes.push(Node {
                key: record.key.clone(),
                name: record.name.clone(),
                rank_level: record.rank_level,
                leaf_class_index: record.leaf_class_index,
                spatial_threshold: record.spatial_threshold,
                iconic_id: record.iconic_id.clone(),
                spatial_id: record.spatial_id.clone(),
                parent: None,
                children: Vec::new(),
            });
        }

        // Link parents; child order follows input order for deterministic
        // tie-breaking later.
        for (i, record) in records.iter().enumerate() {
            let id = i + 1;
            let parent_id = match record.parent_key.as_deref() {
                Some(parent_key) if !parent_key.is_empty() => *by_key.get(parent_key).ok_or_else(|| {
                    TaxonomyError::UnknownParent {
                        key: record.key.clone(),
                        parent_key: parent_key.to_string(),
                    }
                })?,
                _ => ROOT_ID,
            };
            nodes[id].parent = Some(parent_id);
            nodes[parent_id].children.push(id);
        }

        for node in &nodes {
            if node.leaf_class_index.is_some() && !node.children.is_empty() {
                return Err(TaxonomyError::LeafWithChildren(node.key.clone()));
            }
        }

        // Leaf class indices must be exactly 0..leaf_count: with that many
        // leaves, in-range plus distinct implies dense.
        let leaves: Vec<NodeId> = (0..nodes.len())
            .filter(|&id| nodes[id].is_leaf())
            .collect();
        if leaves.is_empty() {
            return Err(TaxonomyError::NoLeaves);
        }
        let mut by_leaf_index: Vec<Option<NodeId>> = vec![None; leaves.len()];
        for &id in &leaves {
            let node = &nodes[id];
            let Some(index) = node.leaf_class_index else {
                continue;
            };
            if index >= leaves.len() {
                return Err(TaxonomyError::LeafIndexOutOfRange {
                    key: node.key.clone(),
                    index,
                    leaf_count: leaves.len(),
                });
            }
            if let Some(first) = by_leaf_index[index] {
                return Err(TaxonomyError::DuplicateLeafIndex {
                    index,
                    first: nodes[first].key.clone(),
                    second: node.key.clone(),
                });
            }
            by_leaf_index[index] = Some(id);
        }

        // Every node must hang off the root; a parent cycle among records
        // leaves its members unreachable.
        let mut visited = vec![false; nodes.len()];
        let mut stack = vec![ROOT_ID];
        let mut reached = 0usize;
        while let Some(id) = stack.pop() {
            if visited[id] {
                continue;
            }
            visited[id] = true;
            reached += 1;
            stack.extend_from_slice(&nodes[id].children);
        }
        if reached != nodes.len() {
            return Err(TaxonomyError::UnreachableNode {
                count: nodes.len() - reached,
            });
        }

        info!(
            nodes = nodes.len(),
            leaves = leaves.len(),
            "built taxonomy tree"
        );

        Ok(Self {
            nodes,
            by_key,
            leaves,
        })
    }

    /// Arena index of the synthetic root.
    pub fn root(&self) -> NodeId {
        ROOT_ID
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Total node count, including the synthetic root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of a node, in taxonomy-file input order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// All leaf nodes, in taxonomy-file input order.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Length of the classifier output vector this tree expects.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Ancestors of a node ordered root first, immediate parent last.
    ///
    /// The root itself has no ancestors.
    pub fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.nodes[parent].parent;
        }
        ancestors.reverse();
        ancestors
    }

    /// Whether `taxon_key` names this node or any of its ancestors.
    ///
    /// Tree depth is bounded by taxonomic rank count, so the walk is cheap
    /// and uncached.
    pub fn has_ancestor_or_self(&self, id: NodeId, taxon_key: &str) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if self.nodes[node_id].key == taxon_key {
                return true;
            }
            current = self.nodes[node_id].parent;
        }
        false
    }
}
