//! Per-call scoring over an immutable taxonomy: channel combination, score
//! rollup with filtering and cutoff pruning, best-branch decoding, and
//! geospatial gating.
//!
//! Everything here is synchronous pure computation. A call borrows a
//! [`taxavision_core::TaxonomyTree`], allocates its own score maps, and
//! returns owned prediction records; nothing is shared between calls.

pub mod aggregate;
pub mod combine;
pub mod config;
pub mod decode;
pub mod error;
pub mod geo;
pub mod predict;
pub mod prediction;

pub use aggregate::{AggregatedScores, DEFAULT_CUTOFF_RATIO, aggregate};
pub use combine::combine_scores;
pub use config::{AggregateOptions, AncestorFilter, PredictionConfig};
pub use decode::best_branch;
pub use error::EngineError;
pub use geo::{GeoGateEntry, GeoGateResult, expected_nearby};
pub use predict::{PredictionResult, predict};
pub use prediction::Prediction;
