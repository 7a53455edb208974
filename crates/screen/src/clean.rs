//! Raw fundamentals cleaning.

use cartera_primitives::CleaningReport;
use polars::prelude::*;

use crate::ScreenError;

/// Configuration for the cleaning stage.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Identifier columns exempt from validation; never touched.
    pub preserve_columns: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            preserve_columns: vec![
                "name".to_string(),
                "primary_code".to_string(),
                "secondary_code".to_string(),
                "isin".to_string(),
                "industry".to_string(),
                "market_cap".to_string(),
            ],
        }
    }
}

/// Drop rows with negative or missing values in any non-preserved numeric
/// column.
///
/// Columns are processed in frame order; counts for each (column,
/// violation) reason are taken against the rows still present when that
/// column is reached, so a row failing several checks is only counted for
/// the first column that rejects it. Non-numeric columns are skipped.
///
/// An output of zero rows is a reportable outcome, not an error; the
/// caller decides whether it blocks progression.
///
/// # Errors
/// Returns an error only for frame-level failures (e.g. a cast that cannot
/// be performed).
pub fn clean(
    df: &DataFrame,
    config: &CleanerConfig,
) -> Result<(DataFrame, CleaningReport), ScreenError> {
    let initial_rows = df.height();
    let mut cleaned = df.clone();
    let mut removed: Vec<(String, usize)> = Vec::new();

    let column_names: Vec<String> =
        df.get_column_names().iter().map(|n| n.to_string()).collect();

    for name in &column_names {
        if config.preserve_columns.iter().any(|p| p == name) {
            continue;
        }

        let column = cleaned.column(name.as_str())?;
        if !is_numeric(column.dtype()) {
            continue;
        }

        let casted = column.cast(&DataType::Float64)?;
        let values = casted.f64()?;

        let negative = values.into_iter().filter(|v| matches!(v, Some(x) if *x < 0.0)).count();
        if negative > 0 {
            removed.push((format!("negative values in {name}"), negative));
        }

        let missing = values.null_count();
        if missing > 0 {
            removed.push((format!("missing values in {name}"), missing));
        }

        if negative > 0 || missing > 0 {
            let keep: Vec<bool> =
                values.into_iter().map(|v| matches!(v, Some(x) if x >= 0.0)).collect();
            let mask = BooleanChunked::from_slice("keep".into(), &keep);
            cleaned = cleaned.filter(&mask)?;
        }
    }

    let final_rows = cleaned.height();
    let report = CleaningReport {
        initial_rows,
        removed,
        final_rows,
        total_removed: initial_rows - final_rows,
    };

    Ok((cleaned, report))
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CleanerConfig {
        CleanerConfig { preserve_columns: vec!["name".to_string()] }
    }

    #[test]
    fn clean_drops_negative_and_missing_rows() {
        // 100 rows: 10 negative in roe, 5 disjoint rows missing pe.
        let mut roe = vec![1.0_f64; 100];
        for v in roe.iter_mut().take(10) {
            *v = -1.0;
        }
        let mut pe: Vec<Option<f64>> = vec![Some(10.0); 100];
        for v in pe.iter_mut().skip(10).take(5) {
            *v = None;
        }
        let names: Vec<String> = (0..100).map(|i| format!("asset{i}")).collect();

        let df = df! {
            "name" => names,
            "roe" => roe,
            "pe" => pe,
        }
        .unwrap();

        let (cleaned, report) = clean(&df, &config()).unwrap();

        assert_eq!(report.initial_rows, 100);
        assert_eq!(report.final_rows, 85);
        assert_eq!(report.total_removed, 15);
        assert_eq!(cleaned.height(), 85);
        assert_eq!(
            report.removed,
            vec![
                ("negative values in roe".to_string(), 10),
                ("missing values in pe".to_string(), 5),
            ]
        );
    }

    #[test]
    fn clean_preserves_identifier_columns() {
        let df = df! {
            "name" => ["a", "b"],
            "market_cap" => [-5.0, 10.0],
        }
        .unwrap();

        let config = CleanerConfig {
            preserve_columns: vec!["name".to_string(), "market_cap".to_string()],
        };
        let (cleaned, report) = clean(&df, &config).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.total_removed, 0);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn clean_counts_overlapping_reasons_once_in_total() {
        // Row 0 is negative in both columns: two reasons, one removal.
        let df = df! {
            "name" => ["a", "b", "c"],
            "x" => [-1.0, 1.0, 2.0],
            "y" => [-2.0, 3.0, 4.0],
        }
        .unwrap();

        let (cleaned, report) = clean(&df, &config()).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.total_removed, 1);
        // The second column no longer sees the already-dropped row.
        assert_eq!(report.removed, vec![("negative values in x".to_string(), 1)]);
    }

    #[test]
    fn clean_to_zero_rows_is_not_an_error() {
        let df = df! {
            "name" => ["a", "b"],
            "x" => [-1.0, -2.0],
        }
        .unwrap();

        let (cleaned, report) = clean(&df, &config()).unwrap();

        assert_eq!(cleaned.height(), 0);
        assert!(report.is_empty_result());
    }

    #[test]
    fn clean_skips_non_numeric_columns() {
        let df = df! {
            "name" => ["a", "b"],
            "note" => [None::<&str>, Some("fine")],
            "x" => [1.0, 2.0],
        }
        .unwrap();

        let (cleaned, report) = clean(&df, &config()).unwrap();

        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.total_removed, 0);
    }
}
