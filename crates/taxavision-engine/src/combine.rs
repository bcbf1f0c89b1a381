//! Elementwise combination of independent evidence channels.

use crate::error::EngineError;

/// Combine vision and geo score vectors into a single evidence vector.
///
/// Vision scores are a probability distribution over leaf classes; geo
/// scores act as a per-leaf spatial prior. The combined evidence is their
/// elementwise product.
pub fn combine_scores(vision: &[f32], geo: &[f32]) -> Result<Vec<f32>, EngineError> {
    if vision.len() != geo.len() {
        return Err(EngineError::DimensionMismatch {
            expected: vision.len(),
            actual: geo.len(),
        });
    }
    Ok(vision.iter().zip(geo).map(|(v, g)| v * g).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementwise_product() {
        let combined = combine_scores(&[0.9, 0.1, 0.5], &[0.5, 1.0, 0.0]).unwrap();
        assert_eq!(combined, vec![0.45, 0.1, 0.0]);
    }

    #[test]
    fn length_mismatch() {
        let err = combine_scores(&[0.9, 0.1], &[0.5]).unwrap_err();
        assert_eq!(
            err,
            EngineError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
