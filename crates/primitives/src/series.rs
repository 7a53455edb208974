//! Return series and covariance containers.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::Date;

/// Ordered daily return observations for a single asset.
///
/// Dates are strictly ascending. Days on which the asset has no
/// observation are simply absent; values are never fabricated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    /// Ticker the series belongs to.
    pub symbol: String,
    /// `(date, daily simple return)` pairs, ascending by date.
    pub observations: Vec<(Date, f64)>,
}

impl ReturnSeries {
    /// Create a new return series.
    #[must_use]
    pub fn new(symbol: impl Into<String>, observations: Vec<(Date, f64)>) -> Self {
        debug_assert!(observations.windows(2).all(|w| w[0].0 < w[1].0));
        Self { symbol: symbol.into(), observations }
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Square, symbol-indexed covariance matrix.
#[derive(Debug, Clone)]
pub struct CovarianceMatrix {
    /// Asset symbols, one per row/column.
    symbols: Vec<String>,
    /// Covariance values (n x n).
    matrix: Array2<f64>,
}

impl CovarianceMatrix {
    /// Create a covariance matrix from symbols and values.
    ///
    /// # Panics
    /// Debug-panics if the matrix is not square or its order does not match
    /// the symbol count.
    #[must_use]
    pub fn new(symbols: Vec<String>, matrix: Array2<f64>) -> Self {
        debug_assert_eq!(matrix.nrows(), matrix.ncols());
        debug_assert_eq!(symbols.len(), matrix.nrows());
        Self { symbols, matrix }
    }

    /// Number of assets.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Asset symbols in matrix order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Raw matrix values.
    #[must_use]
    pub const fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Covariance between two symbols, if both are present.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.matrix[[i, j]])
    }
}
