//! Stage report types.

use serde::{Deserialize, Serialize};

/// Summary of the cleaning stage.
///
/// Per-reason counts are recorded independently for each (column,
/// violation) pair, so a row failing several checks can appear under more
/// than one reason. `total_removed` is the distinct row-count delta and is
/// the number that reconciles with `final_rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Row count before cleaning.
    pub initial_rows: usize,
    /// Removal reasons with per-reason row counts, in column order.
    pub removed: Vec<(String, usize)>,
    /// Row count after cleaning.
    pub final_rows: usize,
    /// Distinct rows removed: `initial_rows - final_rows`.
    pub total_removed: usize,
}

impl CleaningReport {
    /// Whether cleaning removed every row.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        self.final_rows == 0
    }
}

/// Summary of the percentile selection stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    /// Percentile threshold supplied, in [1, 100].
    pub percentile: f64,
    /// Interpolated score value at the percentile.
    pub cutoff_score: f64,
    /// Number of assets with score strictly above the cutoff.
    pub selected: usize,
    /// Number of assets scored.
    pub universe: usize,
    /// `selected / universe` as a fraction.
    pub selection_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_report_counts_reconcile() {
        let report = CleaningReport {
            initial_rows: 100,
            removed: vec![
                ("negative values in roe".to_string(), 10),
                ("missing values in pe".to_string(), 5),
            ],
            final_rows: 85,
            total_removed: 15,
        };
        assert_eq!(report.initial_rows - report.total_removed, report.final_rows);
        assert!(!report.is_empty_result());
    }

    #[test]
    fn cleaning_report_empty_result() {
        let report = CleaningReport {
            initial_rows: 3,
            removed: vec![("missing values in pe".to_string(), 3)],
            final_rows: 0,
            total_removed: 3,
        };
        assert!(report.is_empty_result());
    }
}
