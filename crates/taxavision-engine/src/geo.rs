//! Geospatial "expected nearby" gating.
//!
//! A flat per-leaf comparison, independent of score aggregation: no rollup,
//! no renormalization, just each leaf's raw geo score against its own
//! threshold.

use serde::{Deserialize, Serialize};

use taxavision_core::TaxonomyTree;

use crate::error::EngineError;

/// One leaf's gate outcome, with the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoGateEntry {
    pub taxon_key: String,
    pub name: String,
    pub geo_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_threshold: Option<f32>,
}

/// All leaves, split into expected-nearby and not. The two lists are
/// disjoint and together cover every leaf, in taxonomy-file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoGateResult {
    pub expected: Vec<GeoGateEntry>,
    pub unexpected: Vec<GeoGateEntry>,
}

/// Classify every leaf as expected nearby or not.
///
/// A leaf is expected when its geo score reaches its `spatial_threshold`;
/// leaves with no configured threshold are always expected.
pub fn expected_nearby(
    tree: &TaxonomyTree,
    geo_scores: &[f32],
) -> Result<GeoGateResult, EngineError> {
    if geo_scores.len() != tree.leaf_count() {
        return Err(EngineError::DimensionMismatch {
            expected: tree.leaf_count(),
            actual: geo_scores.len(),
        });
    }

    let mut expected = Vec::new();
    let mut unexpected = Vec::new();
    for &leaf in tree.leaves() {
        let node = tree.node(leaf);
        let Some(index) = node.leaf_class_index else {
            continue;
        };
        let geo_score = geo_scores[index];
        let entry = GeoGateEntry {
            taxon_key: node.key.clone(),
            name: node.name.clone(),
            geo_score,
            spatial_threshold: node.spatial_threshold,
        };
        let nearby = node
            .spatial_threshold
            .is_none_or(|threshold| geo_score >= threshold);
        if nearby {
            expected.push(entry);
        } else {
            unexpected.push(entry);
        }
    }

    Ok(GeoGateResult {
        expected,
        unexpected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxavision_core::NodeRecord;

    fn leaf(key: &str, index: usize, spatial_threshold: Option<f32>) -> NodeRecord {
        NodeRecord {
            key: key.to_string(),
            parent_key: None,
            rank_level: 10.0,
            leaf_class_index: Some(index),
            name: format!("taxon {key}"),
            spatial_threshold,
            iconic_id: None,
            spatial_id: None,
        }
    }

    fn keys(entries: &[GeoGateEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.taxon_key.as_str()).collect()
    }

    #[test]
    fn splits_leaves_by_threshold() {
        let tree = TaxonomyTree::build(vec![
            leaf("2", 0, Some(0.5)),
            leaf("4", 1, None),
        ])
        .unwrap();
        let result = expected_nearby(&tree, &[0.2, 0.8]).unwrap();

        // 0.2 misses its 0.5 threshold; the unthresholded leaf always passes.
        assert_eq!(keys(&result.expected), vec!["4"]);
        assert_eq!(keys(&result.unexpected), vec!["2"]);
        assert!((result.unexpected[0].geo_score - 0.2).abs() < 1e-6);
        assert_eq!(result.unexpected[0].spatial_threshold, Some(0.5));
    }

    #[test]
    fn score_equal_to_threshold_is_expected() {
        let tree = TaxonomyTree::build(vec![leaf("2", 0, Some(0.5))]).unwrap();
        let result = expected_nearby(&tree, &[0.5]).unwrap();
        assert_eq!(result.expected.len(), 1);
        assert!(result.unexpected.is_empty());
    }

    #[test]
    fn covers_every_leaf() {
        let tree = TaxonomyTree::build(vec![
            leaf("2", 0, Some(0.9)),
            leaf("4", 1, Some(0.1)),
            leaf("6", 2, None),
        ])
        .unwrap();
        let result = expected_nearby(&tree, &[0.5, 0.5, 0.5]).unwrap();
        assert_eq!(result.expected.len() + result.unexpected.len(), 3);
    }

    #[test]
    fn rejects_wrong_length() {
        let tree = TaxonomyTree::build(vec![leaf("2", 0, None)]).unwrap();
        let err = expected_nearby(&tree, &[0.5, 0.5]).unwrap_err();
        assert_eq!(
            err,
            EngineError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
    }
}
