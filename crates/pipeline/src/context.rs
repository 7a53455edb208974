//! The immutable pipeline context threaded through the six stages.

use std::collections::HashMap;

use cartera_optimizer::{OptimizerConfig, Portfolio, PortfolioOptimizer};
use cartera_primitives::{CleaningReport, Date, SelectedAsset, SelectionSummary};
use cartera_returns::{AnalyzerConfig, PriceSeriesProvider, ReturnsAnalysis, ReturnsAnalyzer};
use cartera_screen::{CleanerConfig, ColumnLayout, ScreenError};
use polars::prelude::DataFrame;
use tracing::info;

use crate::{PipelineError, RunParameters, Stage};

/// Snapshot of a pipeline run.
///
/// Every stage method consumes the context and returns a new one with that
/// stage's output filled in and all downstream outputs dropped, so re-running
/// an earlier stage always invalidates later results.
#[derive(Debug)]
pub struct PipelineContext {
    raw: DataFrame,
    cleaned: Option<(DataFrame, CleaningReport)>,
    normalized: Option<DataFrame>,
    scored: Option<DataFrame>,
    selected: Option<(Vec<SelectedAsset>, SelectionSummary)>,
    analysis: Option<ReturnsAnalysis>,
    portfolio: Option<Portfolio>,
    params: RunParameters,
}

/// Configuration-shaped screening errors belong to the configuration
/// bucket of the taxonomy; the rest pass through as screening errors.
fn map_screen(err: ScreenError) -> PipelineError {
    match err {
        ScreenError::NoColumnsSelected
        | ScreenError::WeightSum { .. }
        | ScreenError::MissingWeight(_)
        | ScreenError::InvalidPercentile(_) => PipelineError::Configuration(err.to_string()),
        other => PipelineError::Screen(other),
    }
}

impl PipelineContext {
    /// Start a run from a raw fundamentals table.
    #[must_use]
    pub fn new(raw: DataFrame) -> Self {
        Self {
            raw,
            cleaned: None,
            normalized: None,
            scored: None,
            selected: None,
            analysis: None,
            portfolio: None,
            params: RunParameters::default(),
        }
    }

    /// Stage 1: drop rows with negative or missing numeric values.
    ///
    /// # Errors
    /// Returns [`PipelineError::DataQuality`] when no rows survive.
    pub fn clean(mut self, config: &CleanerConfig) -> Result<Self, PipelineError> {
        let (frame, report) = cartera_screen::clean(&self.raw, config)?;
        info!(
            initial = report.initial_rows,
            removed = report.total_removed,
            "cleaning complete"
        );
        if report.is_empty_result() {
            return Err(PipelineError::DataQuality { report });
        }

        self.cleaned = Some((frame, report));
        self.normalized = None;
        self.scored = None;
        self.selected = None;
        self.analysis = None;
        self.portfolio = None;
        Ok(self)
    }

    /// Stage 2: min-max scale the metric columns, inverting where lower is
    /// better.
    ///
    /// # Errors
    /// Returns [`PipelineError::StageNotReady`] before [`Self::clean`], and
    /// [`PipelineError::Configuration`] for an empty column selection.
    pub fn normalize(
        mut self,
        columns: &[String],
        invert: &[String],
    ) -> Result<Self, PipelineError> {
        let Some((cleaned, _)) = &self.cleaned else {
            return Err(PipelineError::StageNotReady {
                required: Stage::Clean,
                attempted: Stage::Normalize,
            });
        };

        let frame = cartera_screen::normalize(cleaned, columns, invert).map_err(map_screen)?;
        info!(columns = columns.len(), inverted = invert.len(), "normalization complete");

        self.normalized = Some(frame);
        self.scored = None;
        self.selected = None;
        self.analysis = None;
        self.portfolio = None;
        Ok(self)
    }

    /// Stage 3: weighted composite score and competition rank.
    ///
    /// # Errors
    /// Returns [`PipelineError::Configuration`] when weights are missing or
    /// do not sum to 100 within tolerance.
    pub fn score(
        mut self,
        columns: &[String],
        weights: &HashMap<String, f64>,
    ) -> Result<Self, PipelineError> {
        let Some(normalized) = &self.normalized else {
            return Err(PipelineError::StageNotReady {
                required: Stage::Normalize,
                attempted: Stage::Score,
            });
        };

        let frame =
            cartera_screen::composite_scores(normalized, columns, weights).map_err(map_screen)?;
        info!(columns = columns.len(), "composite scoring complete");

        self.scored = Some(frame);
        self.selected = None;
        self.analysis = None;
        self.portfolio = None;
        Ok(self)
    }

    /// Stage 4: percentile cutoff and market-cap bucketing.
    ///
    /// Selecting zero assets is not an error here; the run blocks at the
    /// analysis stage instead, once it is clear no data can be fetched.
    ///
    /// # Errors
    /// Returns [`PipelineError::Configuration`] for a percentile outside
    /// `[1, 100]`.
    pub fn select(
        mut self,
        percentile: f64,
        layout: &ColumnLayout,
    ) -> Result<Self, PipelineError> {
        let Some(scored) = &self.scored else {
            return Err(PipelineError::StageNotReady {
                required: Stage::Score,
                attempted: Stage::Select,
            });
        };

        let (assets, summary) =
            cartera_screen::select(scored, percentile, layout).map_err(map_screen)?;
        info!(
            selected = summary.selected,
            universe = summary.universe,
            cutoff = summary.cutoff_score,
            "selection complete"
        );
        self.params.record("Selection Percentile", percentile);
        self.params.record("Score Cutoff", format!("{:.4}", summary.cutoff_score));

        self.selected = Some((assets, summary));
        self.analysis = None;
        self.portfolio = None;
        Ok(self)
    }

    /// Stage 5: fetch price histories and estimate returns and covariance.
    ///
    /// # Errors
    /// Returns [`PipelineError::Returns`] when no asset yields usable data.
    pub fn analyze(
        mut self,
        provider: &dyn PriceSeriesProvider,
        end: Date,
        config: AnalyzerConfig,
    ) -> Result<Self, PipelineError> {
        let Some((assets, _)) = &self.selected else {
            return Err(PipelineError::StageNotReady {
                required: Stage::Select,
                attempted: Stage::Analyze,
            });
        };

        let analysis = ReturnsAnalyzer::new(config).analyze(assets, provider, end)?;
        info!(
            assets = analysis.panel.n_assets(),
            trading_days = analysis.trading_days.trading_days,
            skipped = analysis.skipped.len(),
            positive_definite = analysis.diagnostics.is_positive_definite,
            "returns analysis complete"
        );
        self.params.record("History Window (days)", config.window_days);
        self.params.record("History End Date", end);

        self.analysis = Some(analysis);
        self.portfolio = None;
        Ok(self)
    }

    /// Stage 6: solve for portfolio weights.
    ///
    /// # Errors
    /// Returns [`PipelineError::Configuration`] for invalid risk
    /// parameters and [`PipelineError::Optimizer`] when the solve fails.
    pub fn optimize(mut self, config: &OptimizerConfig) -> Result<Self, PipelineError> {
        let (Some((assets, _)), Some(analysis)) = (&self.selected, &self.analysis) else {
            return Err(PipelineError::StageNotReady {
                required: Stage::Analyze,
                attempted: Stage::Optimize,
            });
        };

        config.validate().map_err(|err| PipelineError::Configuration(err.to_string()))?;

        let optimizer = PortfolioOptimizer::new(config.clone());
        let portfolio = optimizer.optimize(
            assets,
            &analysis.annualized_mean_returns,
            &analysis.covariance,
        )?;
        info!(
            objective = config.objective.name(),
            holdings = portfolio.holdings.len(),
            "optimization complete"
        );

        self.params.record("Optimization Objective", config.objective.name());
        self.params
            .record("Risk-free Rate (%)", format!("{:.1}", config.risk_free_rate * 100.0));
        self.params
            .record("Max Stock Weight (%)", format!("{:.1}", config.max_stock_weight * 100.0));
        for (industry, cap) in &config.industry_caps {
            self.params
                .record(format!("Max {industry} Weight (%)"), format!("{:.1}", cap * 100.0));
        }
        for (bucket, cap) in &config.bucket_caps {
            self.params
                .record(format!("Max {bucket} Weight (%)"), format!("{:.1}", cap * 100.0));
        }

        self.portfolio = Some(portfolio);
        Ok(self)
    }

    /// The raw input table.
    #[must_use]
    pub const fn raw(&self) -> &DataFrame {
        &self.raw
    }

    /// Cleaned table, once stage 1 has run.
    #[must_use]
    pub fn cleaned(&self) -> Option<&DataFrame> {
        self.cleaned.as_ref().map(|(frame, _)| frame)
    }

    /// Cleaning report, once stage 1 has run.
    #[must_use]
    pub fn cleaning_report(&self) -> Option<&CleaningReport> {
        self.cleaned.as_ref().map(|(_, report)| report)
    }

    /// Normalized table, once stage 2 has run.
    #[must_use]
    pub const fn normalized(&self) -> Option<&DataFrame> {
        self.normalized.as_ref()
    }

    /// Scored and ranked table, once stage 3 has run.
    #[must_use]
    pub const fn scored(&self) -> Option<&DataFrame> {
        self.scored.as_ref()
    }

    /// Selected assets, once stage 4 has run.
    #[must_use]
    pub fn selected(&self) -> Option<&[SelectedAsset]> {
        self.selected.as_ref().map(|(assets, _)| assets.as_slice())
    }

    /// Selection summary, once stage 4 has run.
    #[must_use]
    pub fn selection_summary(&self) -> Option<&SelectionSummary> {
        self.selected.as_ref().map(|(_, summary)| summary)
    }

    /// Returns analysis, once stage 5 has run.
    #[must_use]
    pub const fn analysis(&self) -> Option<&ReturnsAnalysis> {
        self.analysis.as_ref()
    }

    /// Solved portfolio, once stage 6 has run.
    #[must_use]
    pub const fn portfolio(&self) -> Option<&Portfolio> {
        self.portfolio.as_ref()
    }

    /// Parameter log accumulated so far.
    #[must_use]
    pub const fn parameters(&self) -> &RunParameters {
        &self.params
    }
}
