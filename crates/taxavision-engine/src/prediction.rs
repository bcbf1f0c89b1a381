//! Host-facing prediction records.

use serde::{Deserialize, Serialize};

use taxavision_core::{NodeId, TaxonomyTree, rank_name};

use crate::aggregate::AggregatedScores;

/// One step of the decoded taxonomic ladder.
///
/// `vision_score` and `geo_score` are present only for dual-channel calls.
/// Ancestor keys run root-to-parent, ready for display or serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub taxon_key: String,
    pub name: String,
    pub rank_level: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_name: Option<String>,
    pub combined_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_score: Option<f32>,
    pub ancestor_keys: Vec<String>,
}

impl Prediction {
    /// Assemble the record for one node from the aggregated maps.
    ///
    /// A node missing from the combined map reads as score 0; the decoder
    /// relies on this for the never-filtered root.
    pub(crate) fn from_scores(tree: &TaxonomyTree, id: NodeId, scores: &AggregatedScores) -> Self {
        let node = tree.node(id);
        Self {
            taxon_key: node.key.clone(),
            name: node.name.clone(),
            rank_level: node.rank_level,
            rank_name: rank_name(node.rank_level).map(str::to_string),
            combined_score: scores.combined.get(&id).copied().unwrap_or(0.0),
            vision_score: scores
                .vision
                .as_ref()
                .and_then(|map| map.get(&id).copied()),
            geo_score: scores.geo.as_ref().and_then(|map| map.get(&id).copied()),
            ancestor_keys: tree
                .ancestors_of(id)
                .into_iter()
                .map(|ancestor| tree.node(ancestor).key.clone())
                .collect(),
        }
    }
}
