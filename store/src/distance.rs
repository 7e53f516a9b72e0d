//! Local distance computation for the in-memory backend.
//!
//! The SQL backend never uses these: it delegates distance to the engine's
//! vector functions. The in-memory backend mirrors those semantics here.

use crate::error::{Result, StoreError};

/// Cosine distance between two vectors: `1 - cosine_similarity`, in [0, 2].
///
/// A zero-magnitude vector is treated as orthogonal to everything
/// (distance 1.0).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_lengths(a, b)?;

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let mag_a: f64 = a.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return Ok(1.0);
    }

    Ok(1.0 - dot / (mag_a * mag_b))
}

/// Euclidean (L2) distance between two vectors.
pub fn l2_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    check_lengths(a, b)?;

    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum();

    Ok(sum.sqrt())
}

fn check_lengths(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(StoreError::InvalidVector {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}
