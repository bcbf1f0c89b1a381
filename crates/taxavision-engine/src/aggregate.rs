//! Score rollup from leaf classes to every ancestor taxon.
//!
//! One post-order walk computes every channel at once: the combined evidence
//! drives pruning and retention, while vision and geo rollups ride along in
//! parallel maps with their own excluded-mass accounting. Probability
//! channels sum over children; the geo prior takes the max of its retained
//! children, since a spatial prior is a ceiling, not additive mass.

use std::collections::HashMap;

use tracing::debug;

use taxavision_core::{NodeId, TaxonomyTree};

use crate::combine::combine_scores;
use crate::config::{AggregateOptions, AncestorFilter};
use crate::error::EngineError;

/// Fraction of the top raw score used as the rollup cutoff when the caller
/// does not supply one. Empirical, not derived; override per call.
pub const DEFAULT_CUTOFF_RATIO: f32 = 0.001;

/// Per-node aggregated scores for one inference call, keyed by arena index.
///
/// `vision` and `geo` are present only when geo evidence was supplied;
/// a vision-only call puts its rollup in `combined` alone. Nodes whose
/// entire subtree was excluded have no entry in any map.
#[derive(Debug, Default)]
pub struct AggregatedScores {
    pub combined: HashMap<NodeId, f32>,
    pub vision: Option<HashMap<NodeId, f32>>,
    pub geo: Option<HashMap<NodeId, f32>>,
}

/// Aggregate raw leaf scores up through every ancestor.
///
/// `vision` must have length `tree.leaf_count()`, as must `geo` when given.
/// Exclusion happens at leaves only: a leaf is dropped when the ancestor
/// filter rejects it or its raw primary score falls below the cutoff, and
/// its raw mass moves to the excluded accumulator of each channel. After the
/// walk, every channel is renormalized by its own `1 - excluded` so retained
/// mass again sums to one; a non-positive divisor clamps the channel to zero
/// instead of producing `Inf`/`NaN`.
pub fn aggregate(
    tree: &TaxonomyTree,
    vision: &[f32],
    geo: Option<&[f32]>,
    options: &AggregateOptions,
) -> Result<AggregatedScores, EngineError> {
    let leaf_count = tree.leaf_count();
    if vision.len() != leaf_count {
        return Err(EngineError::DimensionMismatch {
            expected: leaf_count,
            actual: vision.len(),
        });
    }
    if let Some(geo) = geo {
        if geo.len() != leaf_count {
            return Err(EngineError::DimensionMismatch {
                expected: leaf_count,
                actual: geo.len(),
            });
        }
    }

    // With geo evidence the combined product drives pruning and retention;
    // vision alone does otherwise.
    let combined = geo.map(|geo| combine_scores(vision, geo)).transpose()?;
    let primary: &[f32] = combined.as_deref().unwrap_or(vision);

    let cutoff = match options.cutoff {
        Some(cutoff) => cutoff.max(0.0),
        None => top_score(primary) * DEFAULT_CUTOFF_RATIO,
    };

    let mut rollup = Rollup {
        tree,
        primary,
        vision: geo.is_some().then_some(vision),
        geo,
        cutoff,
        filter: options.filter.as_ref(),
        scores: AggregatedScores {
            combined: HashMap::new(),
            vision: geo.map(|_| HashMap::new()),
            geo: geo.map(|_| HashMap::new()),
        },
        excluded_primary: 0.0,
        excluded_vision: 0.0,
        excluded_geo: 0.0,
    };
    rollup.walk(tree.root());

    let Rollup {
        mut scores,
        excluded_primary,
        excluded_vision,
        excluded_geo,
        ..
    } = rollup;
    debug!(
        cutoff,
        excluded_primary,
        entries = scores.combined.len(),
        "score rollup complete"
    );

    renormalize(&mut scores.combined, excluded_primary);
    if let Some(map) = scores.vision.as_mut() {
        renormalize(map, excluded_vision);
    }
    if let Some(map) = scores.geo.as_mut() {
        renormalize(map, excluded_geo);
    }
    Ok(scores)
}

/// Scores a retained node contributes to its parent, one value per channel.
#[derive(Clone, Copy)]
struct Emitted {
    primary: f32,
    vision: Option<f32>,
    geo: Option<f32>,
}

struct Rollup<'a> {
    tree: &'a TaxonomyTree,
    primary: &'a [f32],
    vision: Option<&'a [f32]>,
    geo: Option<&'a [f32]>,
    cutoff: f32,
    filter: Option<&'a AncestorFilter>,
    scores: AggregatedScores,
    excluded_primary: f32,
    excluded_vision: f32,
    excluded_geo: f32,
}

impl Rollup<'_> {
    /// Post-order walk; returns the node's emitted scores, or `None` when
    /// its whole subtree was excluded. Recursion depth is bounded by
    /// taxonomic rank count (< 30 levels).
    fn walk(&mut self, id: NodeId) -> Option<Emitted> {
        let tree = self.tree;
        let node = tree.node(id);

        if let Some(index) = node.leaf_class_index {
            if let Some(filter) = self.filter {
                if tree.has_ancestor_or_self(id, &filter.taxon_id) == filter.negate {
                    self.exclude(index);
                    return None;
                }
            }
            if self.primary[index] < self.cutoff {
                self.exclude(index);
                return None;
            }
            let emitted = Emitted {
                primary: self.primary[index],
                vision: self.vision.map(|vision| vision[index]),
                geo: self.geo.map(|geo| geo[index]),
            };
            self.emit(id, emitted);
            return Some(emitted);
        }

        let mut primary_sum = 0.0f32;
        let mut vision_sum = 0.0f32;
        let mut geo_max: Option<f32> = None;
        for &child in tree.children(id) {
            let Some(child_scores) = self.walk(child) else {
                continue;
            };
            primary_sum += child_scores.primary;
            if let Some(score) = child_scores.vision {
                vision_sum += score;
            }
            if let Some(score) = child_scores.geo {
                geo_max = Some(geo_max.map_or(score, |max| max.max(score)));
            }
        }

        // The cutoff applies at leaves only; an internal node is retained
        // whenever its surviving descendants carry any mass.
        if primary_sum > 0.0 {
            let emitted = Emitted {
                primary: primary_sum,
                vision: self.vision.map(|_| vision_sum),
                geo: geo_max,
            };
            self.emit(id, emitted);
            Some(emitted)
        } else {
            None
        }
    }

    fn emit(&mut self, id: NodeId, emitted: Emitted) {
        self.scores.combined.insert(id, emitted.primary);
        if let (Some(map), Some(score)) = (self.scores.vision.as_mut(), emitted.vision) {
            map.insert(id, score);
        }
        if let (Some(map), Some(score)) = (self.scores.geo.as_mut(), emitted.geo) {
            map.insert(id, score);
        }
    }

    fn exclude(&mut self, index: usize) {
        self.excluded_primary += self.primary[index];
        if let Some(vision) = self.vision {
            self.excluded_vision += vision[index];
        }
        if let Some(geo) = self.geo {
            self.excluded_geo += geo[index];
        }
    }
}

fn top_score(scores: &[f32]) -> f32 {
    scores.iter().copied().fold(0.0f32, f32::max)
}

fn renormalize(map: &mut HashMap<NodeId, f32>, excluded: f32) {
    let divisor = 1.0 - excluded;
    if divisor > 0.0 {
        for score in map.values_mut() {
            *score /= divisor;
        }
    } else {
        // Excluded mass at or above 1 only arises from float drift or
        // non-distribution input; zero the channel instead of emitting
        // Inf/NaN.
        for score in map.values_mut() {
            *score = 0.0;
        }
    }
}
