//! Group exposure constraints over industries and market-cap buckets.

use std::collections::BTreeMap;

use cartera_primitives::{MarketCapBucket, SelectedAsset};
use ndarray::Array1;

use crate::OptimizerError;

/// Cap on the total weight of one group of assets.
///
/// Indices are resolved against the solve order once, at build time, so
/// the constraint never needs the asset list again.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupConstraint {
    /// Group label, for reporting.
    pub label: String,
    /// Positions of the group's assets in the weight vector.
    pub indices: Vec<usize>,
    /// Maximum total weight fraction for the group.
    pub cap: f64,
}

impl GroupConstraint {
    /// Total weight currently allocated to the group.
    #[must_use]
    pub fn exposure(&self, weights: &Array1<f64>) -> f64 {
        self.indices.iter().map(|&i| weights[i]).sum()
    }

    /// Constraint violation `exposure - cap`; non-positive when satisfied.
    #[must_use]
    pub fn violation(&self, weights: &Array1<f64>) -> f64 {
        self.exposure(weights) - self.cap
    }
}

/// All group constraints of one optimization problem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    groups: Vec<GroupConstraint>,
}

impl ConstraintSet {
    /// Wrap pre-resolved group constraints.
    #[must_use]
    pub fn from_groups(groups: Vec<GroupConstraint>) -> Self {
        Self { groups }
    }

    /// Build group constraints for the assets present in the solve order.
    ///
    /// One constraint per industry and per market-cap bucket, but only for
    /// groups that actually contain at least one solved asset and whose cap
    /// is binding (below 1). Assets in `solve_order` that are missing from
    /// `assets` simply belong to no group.
    ///
    /// # Errors
    /// Returns [`OptimizerError::InvalidConfig`] when any cap falls outside
    /// `[0, 1]`.
    pub fn build(
        assets: &[SelectedAsset],
        solve_order: &[String],
        industry_caps: &BTreeMap<String, f64>,
        bucket_caps: &BTreeMap<MarketCapBucket, f64>,
    ) -> Result<Self, OptimizerError> {
        for (label, cap) in industry_caps
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .chain(bucket_caps.iter().map(|(k, v)| (k.to_string(), *v)))
        {
            if !(0.0..=1.0).contains(&cap) {
                return Err(OptimizerError::InvalidConfig(format!(
                    "cap for '{label}' is {cap}, must be in [0, 1]"
                )));
            }
        }

        let position = |symbol: &str| solve_order.iter().position(|s| s == symbol);

        let mut groups = Vec::new();
        for (industry, &cap) in industry_caps {
            let indices: Vec<usize> = assets
                .iter()
                .filter(|a| a.industry == *industry)
                .filter_map(|a| position(a.symbol.as_str()))
                .collect();
            if !indices.is_empty() && cap < 1.0 {
                groups.push(GroupConstraint { label: industry.clone(), indices, cap });
            }
        }
        for (&bucket, &cap) in bucket_caps {
            let indices: Vec<usize> = assets
                .iter()
                .filter(|a| a.bucket == bucket)
                .filter_map(|a| position(a.symbol.as_str()))
                .collect();
            if !indices.is_empty() && cap < 1.0 {
                groups.push(GroupConstraint { label: bucket.to_string(), indices, cap });
            }
        }

        Ok(Self { groups })
    }

    /// The group constraints, in build order.
    #[must_use]
    pub fn groups(&self) -> &[GroupConstraint] {
        &self.groups
    }

    /// Number of group constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no group constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Largest positive violation across all groups; 0 when feasible.
    #[must_use]
    pub fn max_violation(&self, weights: &Array1<f64>) -> f64 {
        self.groups.iter().map(|g| g.violation(weights).max(0.0)).fold(0.0, f64::max)
    }

    /// The caps must jointly admit a total weight of 1: groups partition
    /// the assets within one dimension (industry, bucket), so each
    /// partition's caps plus uncapped assets must reach the budget.
    pub(crate) fn check_feasible(&self, n_assets: usize, max_stock_weight: f64) -> Result<(), OptimizerError> {
        // A cruder necessary condition is checked per group: the group's
        // own assets cannot be forced above their cap by the per-asset
        // bound on everyone else.
        for g in &self.groups {
            let outside = n_assets - g.indices.len();
            let reachable_outside = outside as f64 * max_stock_weight;
            if g.cap + reachable_outside < 1.0 - 1e-12 {
                return Err(OptimizerError::Infeasible(format!(
                    "'{}' capped at {:.2} but the other {} assets can only absorb {:.2}",
                    g.label, g.cap, outside, reachable_outside
                )));
            }
        }
        Ok(())
    }
}
