//! Greedy best-branch decoding of aggregated scores.

use taxavision_core::{NodeId, TaxonomyTree};

use crate::aggregate::AggregatedScores;
use crate::prediction::Prediction;

/// Walk the tree root-to-leaf, at each level taking the child with the
/// greatest aggregated score.
///
/// Children absent from the combined map were fully pruned and are skipped;
/// the walk stops at the deepest node with any surviving child. Ties go to
/// the earlier child in taxonomy-file order, so identical inputs always
/// decode to an identical path. The root is always emitted, even when the
/// whole map is empty (score 0: an "all evidence excluded" result).
pub fn best_branch(tree: &TaxonomyTree, scores: &AggregatedScores) -> Vec<Prediction> {
    let mut branch = vec![Prediction::from_scores(tree, tree.root(), scores)];

    let mut current = tree.root();
    loop {
        let mut best: Option<(NodeId, f32)> = None;
        for &child in tree.children(current) {
            let Some(&score) = scores.combined.get(&child) else {
                continue;
            };
            // Strictly-greater keeps the first child on ties.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }
        let Some((child, _)) = best else {
            break;
        };
        branch.push(Prediction::from_scores(tree, child, scores));
        current = child;
    }

    branch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::config::{AggregateOptions, AncestorFilter};
    use taxavision_core::{NodeRecord, ROOT_KEY};

    fn record(
        key: &str,
        parent_key: Option<&str>,
        rank_level: f32,
        leaf_class_index: Option<usize>,
    ) -> NodeRecord {
        NodeRecord {
            key: key.to_string(),
            parent_key: parent_key.map(str::to_string),
            rank_level,
            leaf_class_index,
            name: format!("taxon {key}"),
            spatial_threshold: None,
            iconic_id: None,
            spatial_id: None,
        }
    }

    /// root → 1 → 2 (leaf 0), root → 3 → 4 (leaf 1).
    fn two_branch_tree() -> TaxonomyTree {
        TaxonomyTree::build(vec![
            record("1", None, 70.0, None),
            record("2", Some("1"), 10.0, Some(0)),
            record("3", None, 70.0, None),
            record("4", Some("3"), 10.0, Some(1)),
        ])
        .unwrap()
    }

    fn zero_cutoff() -> AggregateOptions {
        AggregateOptions {
            cutoff: Some(0.0),
            ..Default::default()
        }
    }

    fn path_keys(branch: &[Prediction]) -> Vec<&str> {
        branch.iter().map(|p| p.taxon_key.as_str()).collect()
    }

    #[test]
    fn decodes_strongest_branch_root_to_leaf() {
        let tree = two_branch_tree();
        let scores = aggregate(&tree, &[0.9, 0.1], None, &zero_cutoff()).unwrap();
        let branch = best_branch(&tree, &scores);

        assert_eq!(path_keys(&branch), vec![ROOT_KEY, "1", "2"]);
        assert!((branch[0].combined_score - 1.0).abs() < 1e-6);
        assert!((branch[2].combined_score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn rank_levels_never_increase_along_branch() {
        let tree = two_branch_tree();
        let scores = aggregate(&tree, &[0.4, 0.6], None, &zero_cutoff()).unwrap();
        let branch = best_branch(&tree, &scores);

        for pair in branch.windows(2) {
            assert!(pair[1].rank_level <= pair[0].rank_level);
        }
    }

    #[test]
    fn identical_inputs_decode_identically() {
        let tree = two_branch_tree();
        let scores = aggregate(&tree, &[0.5, 0.5], None, &zero_cutoff()).unwrap();

        let first = best_branch(&tree, &scores);
        let second = best_branch(&tree, &scores);
        assert_eq!(path_keys(&first), path_keys(&second));
    }

    #[test]
    fn ties_go_to_the_earlier_child() {
        let tree = two_branch_tree();
        let scores = aggregate(&tree, &[0.5, 0.5], None, &zero_cutoff()).unwrap();
        let branch = best_branch(&tree, &scores);

        // Taxon 1 precedes taxon 3 in input order.
        assert_eq!(path_keys(&branch), vec![ROOT_KEY, "1", "2"]);
    }

    #[test]
    fn skips_pruned_children() {
        let tree = two_branch_tree();
        // 0.9 is pruned, so the branch follows the weaker surviving side.
        let options = AggregateOptions {
            cutoff: Some(0.0),
            filter: Some(AncestorFilter {
                taxon_id: "3".to_string(),
                negate: false,
            }),
        };
        let scores = aggregate(&tree, &[0.9, 0.1], None, &options).unwrap();
        let branch = best_branch(&tree, &scores);

        assert_eq!(path_keys(&branch), vec![ROOT_KEY, "3", "4"]);
        assert!((branch[2].combined_score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_map_yields_root_only_path() {
        let tree = two_branch_tree();
        let options = AggregateOptions {
            cutoff: Some(0.0),
            filter: Some(AncestorFilter {
                taxon_id: "999".to_string(),
                negate: false,
            }),
        };
        let scores = aggregate(&tree, &[0.9, 0.1], None, &options).unwrap();
        assert!(scores.combined.is_empty());

        let branch = best_branch(&tree, &scores);
        assert_eq!(path_keys(&branch), vec![ROOT_KEY]);
        assert_eq!(branch[0].combined_score, 0.0);
    }

    #[test]
    fn dual_channel_branch_carries_all_scores() {
        let tree = two_branch_tree();
        let scores = aggregate(&tree, &[0.9, 0.1], Some(&[0.5, 1.0]), &zero_cutoff()).unwrap();
        let branch = best_branch(&tree, &scores);

        // Combined = [0.45, 0.1], so the vision-strong side still wins.
        assert_eq!(path_keys(&branch), vec![ROOT_KEY, "1", "2"]);
        let leaf = &branch[2];
        assert!((leaf.combined_score - 0.45).abs() < 1e-6);
        assert!((leaf.vision_score.unwrap() - 0.9).abs() < 1e-6);
        assert!((leaf.geo_score.unwrap() - 0.5).abs() < 1e-6);
    }
}
