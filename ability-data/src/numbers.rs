//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Ratio of two counts as a percentage, returning 0.0 when the denominator is zero.
#[must_use]
pub fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    count_to_f64(numerator) / count_to_f64(denominator) * 100.0
}

/// Mean of a slice of counts, 0.0 for an empty slice.
#[must_use]
pub fn mean_of_counts(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    count_to_f64(values.iter().sum()) / count_to_f64(values.len())
}

/// Number of unordered pairs of distinct symbols drawn from an alphabet, `C(n, 2)`.
#[must_use]
pub const fn pair_count(alphabet_size: usize) -> usize {
    alphabet_size.saturating_mul(alphabet_size.saturating_sub(1)) / 2
}
