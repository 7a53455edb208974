//! Portfolio weight container.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Optimal portfolio weights, one fraction per symbol.
///
/// Produced once per optimization run and never mutated afterwards;
/// re-running the optimizer creates a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeights {
    /// Asset symbols in solve order.
    symbols: Vec<String>,
    /// Weight fractions aligned with `symbols`.
    #[serde(skip)]
    weights: Array1<f64>,
}

impl PortfolioWeights {
    /// Create portfolio weights.
    ///
    /// # Panics
    /// Debug-panics if symbol and weight counts differ.
    #[must_use]
    pub fn new(symbols: Vec<String>, weights: Array1<f64>) -> Self {
        debug_assert_eq!(symbols.len(), weights.len());
        Self { symbols, weights }
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

    /// Asset symbols in weight order.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Weight fractions in symbol order.
    #[must_use]
    pub const fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Weight fraction for one symbol.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.symbols.iter().position(|s| s == symbol).map(|i| self.weights[i])
    }

    /// Sum of all weight fractions.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }
}
