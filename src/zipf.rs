//! Zipf weight table.

use crate::error::{GenError, try_filled};

/// Probabilities for ranks `1..=n`: rank `i` gets `c / i^alpha` where `c`
/// normalizes the table to sum to one. Index 0 (rank 1) is the most likely.
///
/// # Errors
/// * [`GenError::InvalidConfig`] for `n == 0` or a non-finite `alpha`.
/// * [`GenError::NumericOverflow`] when some `i^alpha` is zero or infinite,
///   or the normalizer degenerates.
/// * [`GenError::ResourceExhaustion`] if the table cannot be allocated.
pub fn zipf_weights(n: u32, alpha: f64) -> Result<Vec<f64>, GenError> {
    if n == 0 {
        return Err(GenError::InvalidConfig(
            "number of weighted elements must be at least 1".into(),
        ));
    }
    if !alpha.is_finite() {
        return Err(GenError::InvalidConfig(format!("alpha must be finite, got {alpha}")));
    }

    let mut table = try_filled(n as usize, 0.0f64, "weight table")?;
    let mut inv_sum = 0.0f64;
    for (i, raw) in table.iter_mut().enumerate() {
        let rank = i as u64 + 1;
        let w = (rank as f64).powf(alpha);
        if w == 0.0 || !w.is_finite() {
            return Err(GenError::NumericOverflow { rank, alpha });
        }
        *raw = w;
        inv_sum += 1.0 / w;
    }

    let c = 1.0 / inv_sum;
    if c == 0.0 || !c.is_finite() {
        return Err(GenError::NumericOverflow {
            rank: u64::from(n),
            alpha,
        });
    }
    for p in &mut table {
        *p = c / *p;
    }
    Ok(table)
}
