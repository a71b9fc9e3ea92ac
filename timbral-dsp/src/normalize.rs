//! Global z-score normalization of the aggregated feature vector

use crate::error::{ExtractError, Result};

/// Rescale a vector to zero mean and unit standard deviation
///
/// Mean and standard deviation (population form) are computed over all
/// elements. Zero variance cannot be normalized and fails with
/// [`ExtractError::DegenerateInput`] rather than propagating NaN.
pub fn zscore(values: &[f32]) -> Result<Vec<f32>> {
    if values.is_empty() {
        return Err(ExtractError::DegenerateInput(
            "empty feature vector".to_string(),
        ));
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std = variance.sqrt();

    if !std.is_finite() || std <= 0.0 {
        return Err(ExtractError::DegenerateInput(
            "feature vector has zero variance".to_string(),
        ));
    }

    Ok(values
        .iter()
        .map(|&v| ((v as f64 - mean) / std) as f32)
        .collect())
}
