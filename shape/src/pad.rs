//! Alignment arithmetic: rounding sizes up to tile multiples.
//!
//! Pure size computations only - applying padding to actual data is the
//! engine's job. Padding is always appended at the high end of a dimension so
//! existing data keeps stable offsets.

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{Result, ZeroMultiplierSnafu};

/// Round each dimension up to the next multiple of its alignment multiplier.
///
/// Dimensions beyond `multipliers.len()` are left unchanged; a multiplier of
/// 1 means "no padding on this dimension".
///
/// The result satisfies, for every aligned dimension `d`:
/// `padded[d] % multipliers[d] == 0` and
/// `0 <= padded[d] - sizes[d] < multipliers[d]`.
///
/// # Errors
///
/// Returns [`ZeroMultiplier`](crate::Error::ZeroMultiplier) when any
/// multiplier is 0.
///
/// # Examples
///
/// ```rust
/// # use tessel_shape::pad::padded_sizes;
/// let padded = padded_sizes(&[5, 16, 3], &[8, 8]).unwrap();
/// assert_eq!(padded.as_slice(), &[8, 16, 3]);
/// ```
pub fn padded_sizes(sizes: &[usize], multipliers: &[usize]) -> Result<SmallVec<[usize; 4]>> {
    validate_multipliers(multipliers)?;

    Ok(sizes
        .iter()
        .enumerate()
        .map(|(dim, &size)| match multipliers.get(dim) {
            Some(&m) => size.div_ceil(m) * m,
            None => size,
        })
        .collect())
}

/// Per-dimension `(low, high)` pad widths; `low` is always 0.
///
/// # Errors
///
/// Returns [`ZeroMultiplier`](crate::Error::ZeroMultiplier) when any
/// multiplier is 0.
pub fn pad_widths(sizes: &[usize], multipliers: &[usize]) -> Result<SmallVec<[(usize, usize); 4]>> {
    let padded = padded_sizes(sizes, multipliers)?;
    Ok(sizes.iter().zip(&padded).map(|(&size, &p)| (0, p - size)).collect())
}

fn validate_multipliers(multipliers: &[usize]) -> Result<()> {
    for (dim, &m) in multipliers.iter().enumerate() {
        ensure!(m > 0, ZeroMultiplierSnafu { dim });
    }
    Ok(())
}
