//! Request-level entry point: combine, aggregate, decode.

use serde::{Deserialize, Serialize};

use taxavision_core::TaxonomyTree;

use crate::aggregate::aggregate;
use crate::config::PredictionConfig;
use crate::decode::best_branch;
use crate::error::EngineError;
use crate::prediction::Prediction;

/// Decoded result for one inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Best-supported path, root first, finest surviving taxon last.
    pub predictions: Vec<Prediction>,
    /// Deepest confidently-supported coarse taxon; only computed when
    /// [`PredictionConfig::common_ancestor_mode`] is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_ancestor: Option<Prediction>,
}

/// Run one full scoring pass over already-materialized model outputs.
///
/// `vision` is the classifier's raw output distribution; `geo`, when given,
/// is the geo model's per-leaf prior and is multiplied in before rollup.
/// All cutoff/filter state comes from `config`, so a shared tree can serve
/// concurrent calls with different settings.
pub fn predict(
    tree: &TaxonomyTree,
    vision: &[f32],
    geo: Option<&[f32]>,
    config: &PredictionConfig,
) -> Result<PredictionResult, EngineError> {
    let scores = aggregate(tree, vision, geo, &config.aggregate_options())?;
    let predictions = best_branch(tree, &scores);
    let common_ancestor = if config.common_ancestor_mode {
        common_ancestor(&predictions, config)
    } else {
        None
    };
    Ok(PredictionResult {
        predictions,
        common_ancestor,
    })
}

/// Deepest branch entry confident enough to stand in for the whole branch.
///
/// Qualifying entries clear the score bar and sit inside the configured
/// rank window, which by default spans genus through kingdom.
fn common_ancestor(branch: &[Prediction], config: &PredictionConfig) -> Option<Prediction> {
    let (finest, coarsest) = config.common_ancestor_rank_range;
    branch
        .iter()
        .rev()
        .find(|prediction| {
            prediction.combined_score >= config.common_ancestor_score_cutoff
                && prediction.rank_level >= finest
                && prediction.rank_level <= coarsest
        })
        .cloned()
}
