//! Descriptive statistics and order-statistic percentiles.

use crate::MathError;

/// Compute the value at percentile `p` using linear interpolation between
/// order statistics.
///
/// Matches the "linear" method: for n values sorted ascending, the target
/// position is `(n - 1) * p / 100` and fractional positions interpolate
/// between the two neighboring order statistics.
///
/// # Errors
/// Returns an error if `p` is outside [0, 100], the input is empty, or any
/// value is not finite.
pub fn percentile_linear(values: &[f64], p: f64) -> Result<f64, MathError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(MathError::InvalidPercentile(p));
    }
    if values.is_empty() {
        return Err(MathError::EmptyData);
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite value in percentile input".to_string()));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = (sorted.len() - 1) as f64 * p / 100.0;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;

    if lo + 1 < sorted.len() {
        Ok(sorted[lo] + frac * (sorted[lo + 1] - sorted[lo]))
    } else {
        Ok(sorted[lo])
    }
}

/// Arithmetic mean, 0.0 for empty input.
#[must_use]
pub fn sample_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1), 0.0 for fewer than two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = sample_mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(25.0, 2.0)]
    #[case(50.0, 3.0)]
    #[case(60.0, 3.4)]
    #[case(100.0, 5.0)]
    fn percentile_interpolates_linearly(#[case] p: f64, #[case] expected: f64) {
        let values = [5.0, 3.0, 1.0, 4.0, 2.0];
        assert_relative_eq!(percentile_linear(&values, p).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn percentile_single_value() {
        assert_relative_eq!(percentile_linear(&[7.0], 60.0).unwrap(), 7.0);
    }

    #[test]
    fn percentile_rejects_out_of_range() {
        assert!(matches!(
            percentile_linear(&[1.0], 101.0),
            Err(MathError::InvalidPercentile(_))
        ));
        assert!(matches!(percentile_linear(&[], 50.0), Err(MathError::EmptyData)));
    }

    #[test]
    fn std_of_constant_is_zero() {
        assert_relative_eq!(sample_std(&[2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn mean_and_std() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(sample_mean(&xs), 3.0);
        assert_relative_eq!(sample_std(&xs), (2.5_f64).sqrt(), epsilon = 1e-12);
    }
}
