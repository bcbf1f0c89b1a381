//! Per-call configuration.
//!
//! Filter and cutoff are request values, never engine state: the tree is the
//! only thing shared between calls, so concurrent requests with different
//! filters cannot interfere.

use serde::{Deserialize, Serialize};

/// Restrict aggregation to leaves inside (or, negated, outside) the subtree
/// of one taxon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AncestorFilter {
    /// Key of the taxon whose subtree is kept (or dropped when `negate`).
    pub taxon_id: String,
    #[serde(default)]
    pub negate: bool,
}

/// Options for a single aggregation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Minimum raw leaf score retained by the rollup. `None` derives
    /// [`crate::aggregate::DEFAULT_CUTOFF_RATIO`] × the top raw score;
    /// negative values are clamped to zero.
    #[serde(default)]
    pub cutoff: Option<f32>,
    #[serde(default)]
    pub filter: Option<AncestorFilter>,
}

/// Request-level configuration for [`crate::predict`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub rollup_cutoff: Option<f32>,
    pub filter_by_taxon_id: Option<String>,
    pub negative_filter: bool,
    /// Also report the deepest confidently-supported coarse taxon.
    pub common_ancestor_mode: bool,
    /// Combined score a branch entry needs to qualify as common ancestor.
    pub common_ancestor_score_cutoff: f32,
    /// Inclusive rank-level window for the common ancestor; the default
    /// spans genus (20) through kingdom (70).
    pub common_ancestor_rank_range: (f32, f32),
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            rollup_cutoff: None,
            filter_by_taxon_id: None,
            negative_filter: false,
            common_ancestor_mode: false,
            common_ancestor_score_cutoff: 0.78,
            common_ancestor_rank_range: (20.0, 70.0),
        }
    }
}

impl PredictionConfig {
    /// The aggregation options this request implies.
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            cutoff: self.rollup_cutoff,
            filter: self.filter_by_taxon_id.clone().map(|taxon_id| AncestorFilter {
                taxon_id,
                negate: self.negative_filter,
            }),
        }
    }
}
