//! Numeric helpers centralizing combinatorics and safe numeric casts.

use num_traits::cast::cast;

/// Binomial coefficient `C(n, r)`, returning 0 when `r > n`.
///
/// Uses the multiplicative form on the smaller of `r` and `n - r`, which
/// keeps every intermediate product an exact integer.
#[must_use]
pub fn binomial(n: u64, r: u64) -> u64 {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    let mut result: u64 = 1;
    for i in 0..r {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Ratio of two counts, or 0.0 when the denominator is zero.
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    u64_to_f64(numerator) / u64_to_f64(denominator)
}

/// Express a probability as a percentage.
#[must_use]
pub fn to_percent(probability: f64) -> f64 {
    probability * 100.0
}
