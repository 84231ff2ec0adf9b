//! Percentile estimation over a finite sample

/// Percentiles reported by [`Histogram::full_results`](super::Histogram::full_results)
pub const DEFAULT_PERCENTILES: [f64; 5] = [0.5, 0.75, 0.95, 0.99, 0.999];

/// Estimate percentile `p` of an ascending slice
///
/// Weighted-average estimator: position `p * (n + 1)`, clamped to the first
/// and last element, linearly interpolated in between. Returns `None` for an
/// empty slice or a NaN rank.
///
/// ```
/// use flowmetrics::histogram::percentile_of_sorted;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile_of_sorted(&sorted, 0.5), Some(3.0));
/// assert_eq!(percentile_of_sorted(&sorted, 0.75), Some(4.5));
/// assert_eq!(percentile_of_sorted(&[], 0.5), None);
/// ```
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let (first, last) = (*sorted.first()?, *sorted.last()?);
    if p.is_nan() {
        return None;
    }

    let n = sorted.len() as f64;
    let pos = p * (n + 1.0);

    if pos < 1.0 {
        return Some(first);
    }
    if pos >= n {
        return Some(last);
    }

    let lower = sorted[pos.floor() as usize - 1];
    let upper = sorted[pos.ceil() as usize - 1];
    Some(lower + (pos - pos.floor()) * (upper - lower))
}

/// Sort a snapshot ascending and estimate each requested percentile from it
pub(crate) fn percentiles_of(mut values: Vec<f64>, ranks: &[f64]) -> Vec<Option<f64>> {
    values.sort_unstable_by(f64::total_cmp);
    ranks
        .iter()
        .map(|&p| percentile_of_sorted(&values, p))
        .collect()
}
