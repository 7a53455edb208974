//! Percentile selection of scored assets.

use cartera_math::percentile_linear;
use cartera_primitives::{
    Exchange, MarketCapBucket, SelectedAsset, SelectionSummary, Symbol,
};
use polars::prelude::*;

use crate::{COMPOSITE_SCORE, RANK, ScreenError};

/// Names of the identity columns consumed by [`select`].
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    /// Display-name column.
    pub name: String,
    /// Industry classification column.
    pub industry: String,
    /// Market capitalization column.
    pub market_cap: String,
    /// Primary exchange code column.
    pub primary_code: String,
    /// Secondary exchange code column.
    pub secondary_code: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            industry: "industry".to_string(),
            market_cap: "market_cap".to_string(),
            primary_code: "primary_code".to_string(),
            secondary_code: "secondary_code".to_string(),
        }
    }
}

/// Select the assets whose composite score is strictly above the given
/// percentile of the scored universe.
///
/// The cutoff is the linearly interpolated percentile of the score column,
/// and the comparison is strict: a score exactly equal to the cutoff is
/// excluded. With `percentile == 100` the cutoff is the maximum score, so
/// no asset can exceed it and the result is empty. Tickers are taken from
/// the primary exchange code when present, otherwise the secondary.
///
/// # Errors
/// Returns [`ScreenError::InvalidPercentile`] when `percentile` falls
/// outside `[1, 100]`, and [`ScreenError::MissingExchangeCode`] when an
/// asset above the cutoff has neither exchange code.
pub fn select(
    df: &DataFrame,
    percentile: f64,
    layout: &ColumnLayout,
) -> Result<(Vec<SelectedAsset>, SelectionSummary), ScreenError> {
    if !(1.0..=100.0).contains(&percentile) || !percentile.is_finite() {
        return Err(ScreenError::InvalidPercentile(percentile));
    }

    let scores_col = df
        .column(COMPOSITE_SCORE)
        .map_err(|_| ScreenError::MissingColumn(COMPOSITE_SCORE.to_string()))?;
    let scores: Vec<f64> =
        scores_col.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect();
    let universe = scores.len();
    if universe == 0 {
        return Err(ScreenError::NoColumnsSelected);
    }

    let cutoff = percentile_linear(&scores, percentile)?;

    let names = utf8_column(df, &layout.name)?;
    let industries = utf8_column(df, &layout.industry)?;
    let primary = utf8_column(df, &layout.primary_code)?;
    let secondary = utf8_column(df, &layout.secondary_code)?;
    let caps_col = df
        .column(layout.market_cap.as_str())
        .map_err(|_| ScreenError::MissingColumn(layout.market_cap.clone()))?
        .cast(&DataType::Float64)?;
    let caps = caps_col.f64()?;
    let ranks = df
        .column(RANK)
        .map_err(|_| ScreenError::MissingColumn(RANK.to_string()))?
        .u32()?;

    let mut selected = Vec::new();
    for i in 0..universe {
        if scores[i] <= cutoff {
            continue;
        }

        let name = names.get(i).unwrap_or("").to_string();
        let (ticker, exchange) = match (non_empty(primary.get(i)), non_empty(secondary.get(i))) {
            (Some(code), _) => (code, Exchange::Primary),
            (None, Some(code)) => (code, Exchange::Secondary),
            (None, None) => return Err(ScreenError::MissingExchangeCode(name)),
        };
        let market_cap = caps.get(i).unwrap_or(f64::NAN);

        selected.push(SelectedAsset {
            name,
            symbol: Symbol::new(ticker),
            exchange,
            industry: industries.get(i).unwrap_or("").to_string(),
            market_cap,
            bucket: MarketCapBucket::classify(market_cap),
            composite_score: scores[i],
            rank: ranks.get(i).unwrap_or(0),
        });
    }

    let summary = SelectionSummary {
        percentile,
        cutoff_score: cutoff,
        selected: selected.len(),
        universe,
        selection_rate: selected.len() as f64 / universe as f64,
    };

    Ok((selected, summary))
}

fn utf8_column(df: &DataFrame, name: &str) -> Result<StringChunked, ScreenError> {
    Ok(df
        .column(name)
        .map_err(|_| ScreenError::MissingColumn(name.to_string()))?
        .str()?
        .clone())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
