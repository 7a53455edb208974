//! Pipeline stage identifiers.

use serde::{Deserialize, Serialize};

/// The six ordered pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Drop rows with negative or missing numeric values.
    Clean,
    /// Min-max scale metric columns, inverting where lower is better.
    Normalize,
    /// Weighted composite score and competition rank.
    Score,
    /// Percentile cutoff and market-cap bucketing.
    Select,
    /// Historical returns, trading-day coverage and covariance.
    Analyze,
    /// Constrained weight optimization.
    Optimize,
}

impl Stage {
    /// All stages in execution order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [Self::Clean, Self::Normalize, Self::Score, Self::Select, Self::Analyze, Self::Optimize]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::Normalize => "normalize",
            Self::Score => "score",
            Self::Select => "select",
            Self::Analyze => "analyze",
            Self::Optimize => "optimize",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        let all = Stage::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
