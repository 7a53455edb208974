//! Min-max normalization with optional direction inversion.

use polars::prelude::*;

use crate::ScreenError;

/// Rescale the selected columns to [0, 1].
///
/// Columns listed in `invert` are negated before scaling, so that "lower is
/// better" metrics end up with 1 as the best value. A constant column
/// (max == min) maps to all zeros rather than dividing by zero.
///
/// The input frame is left untouched; the returned frame carries the
/// normalized values under the same column names.
///
/// # Errors
/// Returns [`ScreenError::NoColumnsSelected`] when `columns` is empty, and
/// a missing-column error when a requested column is absent.
pub fn normalize(
    df: &DataFrame,
    columns: &[String],
    invert: &[String],
) -> Result<DataFrame, ScreenError> {
    if columns.is_empty() {
        return Err(ScreenError::NoColumnsSelected);
    }

    let mut normalized = df.clone();

    for name in columns {
        let column = normalized
            .column(name.as_str())
            .map_err(|_| ScreenError::MissingColumn(name.clone()))?;
        let casted = column.cast(&DataType::Float64)?;
        let values = casted.f64()?;

        let sign = if invert.iter().any(|c| c == name) { -1.0 } else { 1.0 };

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().flatten() {
            let v = v * sign;
            min = min.min(v);
            max = max.max(v);
        }
        let range = max - min;

        let scaled: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| {
                v.map(|x| if range > 0.0 { (x * sign - min) / range } else { 0.0 })
            })
            .collect();

        normalized.with_column(Series::new(name.as_str().into(), scaled))?;
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name).unwrap().f64().unwrap().into_iter().map(|v| v.unwrap()).collect()
    }

    #[test]
    fn normalize_scales_to_unit_range() {
        let df = df! {
            "x" => [1.0, 2.0, 3.0, 4.0, 5.0],
        }
        .unwrap();

        let out = normalize(&df, &["x".to_string()], &[]).unwrap();
        let values = column_values(&out, "x");

        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn normalize_min_zero_max_one() {
        let df = df! {
            "x" => [10.0, -3.0, 7.5, 0.2],
        }
        .unwrap();

        let out = normalize(&df, &["x".to_string()], &[]).unwrap();
        let values = column_values(&out, "x");

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(min, 0.0);
        assert_relative_eq!(max, 1.0);
    }

    #[test]
    fn normalize_inverts_lower_is_better_columns() {
        let df = df! {
            "pe" => [10.0, 20.0, 30.0],
        }
        .unwrap();

        let out = normalize(&df, &["pe".to_string()], &["pe".to_string()]).unwrap();
        let values = column_values(&out, "pe");

        // Lowest input is best and maps to 1.
        assert_relative_eq!(values[0], 1.0);
        assert_relative_eq!(values[1], 0.5);
        assert_relative_eq!(values[2], 0.0);
    }

    #[test]
    fn normalize_constant_column_maps_to_zeros() {
        let df = df! {
            "x" => [4.0, 4.0, 4.0],
        }
        .unwrap();

        let out = normalize(&df, &["x".to_string()], &[]).unwrap();
        assert_eq!(column_values(&out, "x"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_requires_columns() {
        let df = df! { "x" => [1.0] }.unwrap();
        assert!(matches!(normalize(&df, &[], &[]), Err(ScreenError::NoColumnsSelected)));
    }

    #[test]
    fn normalize_leaves_input_frame_unchanged() {
        let df = df! { "x" => [1.0, 3.0] }.unwrap();
        let _ = normalize(&df, &["x".to_string()], &[]).unwrap();
        assert_eq!(column_values(&df, "x"), vec![1.0, 3.0]);
    }
}
