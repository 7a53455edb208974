//! Weighted composite scoring and ranking.

use std::collections::HashMap;

use polars::prelude::*;

use crate::ScreenError;

/// Name of the composite score column added by [`composite_scores`].
pub const COMPOSITE_SCORE: &str = "composite_score";

/// Name of the rank column added by [`composite_scores`].
pub const RANK: &str = "rank";

/// Allowed deviation of the weight sum from 100.
const WEIGHT_TOLERANCE: f64 = 0.1;

/// Validate that every scored column has a weight and the weights sum to
/// 100 within tolerance.
///
/// Scoring itself performs no implicit renormalization, so this must pass
/// before [`composite_scores`] is called.
///
/// # Errors
/// Returns [`ScreenError::MissingWeight`] or [`ScreenError::WeightSum`].
pub fn validate_weights(
    columns: &[String],
    weights: &HashMap<String, f64>,
) -> Result<(), ScreenError> {
    for name in columns {
        if !weights.contains_key(name) {
            return Err(ScreenError::MissingWeight(name.clone()));
        }
    }

    let sum: f64 = columns.iter().map(|c| weights[c]).sum();
    if (sum - 100.0).abs() > WEIGHT_TOLERANCE {
        return Err(ScreenError::WeightSum { sum, tolerance: WEIGHT_TOLERANCE });
    }

    Ok(())
}

/// Compute the weighted composite score and competition rank.
///
/// The score is the dot product of each row's normalized values with the
/// weight percentages divided by 100. The returned frame is sorted by score
/// descending and carries two new columns: [`COMPOSITE_SCORE`] and
/// [`RANK`]. Ranking is competition style: rank 1 is the highest score,
/// tied scores share the lower rank number, and the next distinct score
/// resumes at its positional rank.
///
/// # Errors
/// Returns an error when a scored column is missing or weights are invalid.
pub fn composite_scores(
    df: &DataFrame,
    columns: &[String],
    weights: &HashMap<String, f64>,
) -> Result<DataFrame, ScreenError> {
    if columns.is_empty() {
        return Err(ScreenError::NoColumnsSelected);
    }
    validate_weights(columns, weights)?;

    let mut scores = vec![0.0_f64; df.height()];
    for name in columns {
        let column =
            df.column(name.as_str()).map_err(|_| ScreenError::MissingColumn(name.clone()))?;
        let casted = column.cast(&DataType::Float64)?;
        let values = casted.f64()?;
        let weight = weights[name] / 100.0;

        for (i, v) in values.into_iter().enumerate() {
            scores[i] += v.unwrap_or(0.0) * weight;
        }
    }

    let mut scored = df.clone();
    scored.with_column(Series::new(COMPOSITE_SCORE.into(), scores))?;

    let sorted = scored.sort(
        [COMPOSITE_SCORE],
        SortMultipleOptions::default().with_order_descending(true),
    )?;

    let sorted_scores: Vec<f64> = sorted
        .column(COMPOSITE_SCORE)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NEG_INFINITY))
        .collect();

    let mut ranks = vec![0_u32; sorted_scores.len()];
    for i in 0..sorted_scores.len() {
        if i > 0 && sorted_scores[i] == sorted_scores[i - 1] {
            ranks[i] = ranks[i - 1];
        } else {
            ranks[i] = (i + 1) as u32;
        }
    }

    let mut ranked = sorted;
    ranked.with_column(Series::new(RANK.into(), ranks))?;

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn weights_of(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn weights_must_sum_to_one_hundred() {
        let columns = vec!["a".to_string(), "b".to_string()];

        assert!(validate_weights(&columns, &weights_of(&[("a", 70.0), ("b", 30.0)])).is_ok());
        assert!(validate_weights(&columns, &weights_of(&[("a", 70.05), ("b", 30.0)])).is_ok());
        assert!(matches!(
            validate_weights(&columns, &weights_of(&[("a", 70.0), ("b", 25.0)])),
            Err(ScreenError::WeightSum { .. })
        ));
        assert!(matches!(
            validate_weights(&columns, &weights_of(&[("a", 100.0)])),
            Err(ScreenError::MissingWeight(_))
        ));
    }

    #[test]
    fn composite_score_is_weighted_dot_product() {
        let df = df! {
            "name" => ["x"],
            "a" => [0.5],
            "b" => [1.0],
        }
        .unwrap();
        let columns = vec!["a".to_string(), "b".to_string()];
        let weights = weights_of(&[("a", 70.0), ("b", 30.0)]);

        let out = composite_scores(&df, &columns, &weights).unwrap();
        let score = out.column(COMPOSITE_SCORE).unwrap().f64().unwrap().get(0).unwrap();

        assert_relative_eq!(score, 0.65, epsilon = 1e-12);
    }

    #[test]
    fn ranks_are_competition_style() {
        let df = df! {
            "name" => ["a", "b", "c", "d"],
            "m" => [0.2, 0.9, 0.9, 0.5],
        }
        .unwrap();
        let columns = vec!["m".to_string()];
        let weights = weights_of(&[("m", 100.0)]);

        let out = composite_scores(&df, &columns, &weights).unwrap();
        let ranks: Vec<u32> =
            out.column(RANK).unwrap().u32().unwrap().into_iter().map(|v| v.unwrap()).collect();
        let scores: Vec<f64> = out
            .column(COMPOSITE_SCORE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();

        // Two tied leaders share rank 1; the next score resumes at rank 3.
        assert_eq!(ranks, vec![1, 1, 3, 4]);
        // Rank is monotone non-increasing in score.
        for i in 1..scores.len() {
            assert!(scores[i] <= scores[i - 1]);
            assert!(ranks[i] >= ranks[i - 1]);
        }
    }

    #[test]
    fn weights_apply_after_division_by_one_hundred() {
        let df = df! {
            "a" => [1.0, 0.0],
            "b" => [0.0, 1.0],
        }
        .unwrap();
        let columns = vec!["a".to_string(), "b".to_string()];
        let weights = weights_of(&[("a", 60.0), ("b", 40.0)]);

        let out = composite_scores(&df, &columns, &weights).unwrap();
        let scores: Vec<f64> = out
            .column(COMPOSITE_SCORE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();

        // Sorted descending: 0.6 then 0.4; the applied weights sum to 1.
        assert_relative_eq!(scores[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(scores[1], 0.4, epsilon = 1e-12);
    }
}
