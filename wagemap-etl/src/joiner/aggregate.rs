//! Null-safe aggregation primitives
//!
//! Both helpers treat `None` as "no observation", never as zero. A missing
//! value (or, for the weighted mean, a missing weight) removes the whole
//! contribution from numerator and denominator alike, so absent data can
//! only widen uncertainty, never drag an average toward zero.

/// Sum of the present values; `None` when nothing contributed
pub fn sum_non_null(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut contributing = 0usize;
    for value in values.flatten() {
        sum += value;
        contributing += 1;
    }
    (contributing > 0).then_some(sum)
}

/// Weighted mean over `(value, weight)` pairs.
///
/// Pairs missing either member are excluded entirely; `None` when no pair
/// is complete or the weights sum to zero.
pub fn weighted_mean(pairs: impl Iterator<Item = (Option<f64>, Option<f64>)>) -> Option<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (value, weight) in pairs {
        if let (Some(value), Some(weight)) = (value, weight) {
            numerator += value * weight;
            denominator += weight;
        }
    }
    (denominator > 0.0).then(|| numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_skips_nulls_without_zeroing() {
        let values = vec![Some(1.5), None, Some(2.5)];
        assert_eq!(sum_non_null(values.into_iter()), Some(4.0));
    }

    #[test]
    fn sum_of_all_nulls_is_none() {
        let values: Vec<Option<f64>> = vec![None, None];
        assert_eq!(sum_non_null(values.into_iter()), None);
        assert_eq!(sum_non_null(std::iter::empty()), None);
    }

    #[test]
    fn weighted_mean_excludes_incomplete_pairs_from_both_sides() {
        // Three county medians, one missing its population weight; the
        // incomplete county must not appear in the denominator either
        let pairs = vec![
            (Some(50_000.0), Some(100.0)),
            (Some(60_000.0), Some(200.0)),
            (Some(70_000.0), None),
        ];
        let mean = weighted_mean(pairs.into_iter()).unwrap();
        assert!((mean - 56_666.666_666_666_664).abs() < 1e-6);
    }

    #[test]
    fn weighted_mean_with_no_complete_pair_is_none() {
        let pairs = vec![(Some(50_000.0), None), (None, Some(100.0))];
        assert_eq!(weighted_mean(pairs.into_iter()), None);
        assert_eq!(weighted_mean(std::iter::empty()), None);
    }

    #[test]
    fn zero_total_weight_is_none_not_nan() {
        let pairs = vec![(Some(50_000.0), Some(0.0))];
        assert_eq!(weighted_mean(pairs.into_iter()), None);
    }
}
