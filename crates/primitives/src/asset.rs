//! Asset identity and market-cap classification.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the small-cap bucket, in input currency units.
pub const SMALL_CAP_MAX: f64 = 29182.71;

/// Upper bound (inclusive) of the mid-cap bucket, in input currency units.
pub const MID_CAP_MAX: f64 = 89123.03;

/// Trading ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    /// Create a new symbol.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which exchange code a ticker was derived from.
///
/// The primary exchange code is preferred when both are populated; the
/// secondary is the fallback. The suffix is appended to the ticker when
/// requesting a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// Primary listing (e.g. NSE).
    Primary,
    /// Secondary listing (e.g. BSE).
    Secondary,
}

impl Exchange {
    /// Price-provider ticker suffix for this exchange.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Primary => ".NS",
            Self::Secondary => ".BO",
        }
    }
}

/// Market capitalization bucket.
///
/// The three buckets form a total, non-overlapping partition of the real
/// line: `(-inf, SMALL_CAP_MAX]`, `(SMALL_CAP_MAX, MID_CAP_MAX]`, and
/// `(MID_CAP_MAX, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarketCapBucket {
    /// Capitalization at or below [`SMALL_CAP_MAX`].
    Small,
    /// Capitalization above [`SMALL_CAP_MAX`] and at or below [`MID_CAP_MAX`].
    Mid,
    /// Capitalization above [`MID_CAP_MAX`].
    Large,
}

impl MarketCapBucket {
    /// Classify a market capitalization into its bucket.
    #[must_use]
    pub fn classify(market_cap: f64) -> Self {
        if market_cap <= SMALL_CAP_MAX {
            Self::Small
        } else if market_cap <= MID_CAP_MAX {
            Self::Mid
        } else {
            Self::Large
        }
    }

    /// All buckets in ascending capitalization order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Small, Self::Mid, Self::Large]
    }
}

impl std::fmt::Display for MarketCapBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "Small-Cap"),
            Self::Mid => write!(f, "Mid-Cap"),
            Self::Large => write!(f, "Large-Cap"),
        }
    }
}

/// An asset that survived the percentile cutoff, ready for returns analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAsset {
    /// Display name of the asset.
    pub name: String,
    /// Trading ticker derived from the exchange codes.
    pub symbol: Symbol,
    /// Which exchange code supplied the ticker.
    pub exchange: Exchange,
    /// Industry classification.
    pub industry: String,
    /// Market capitalization in input currency units.
    pub market_cap: f64,
    /// Market-cap bucket assigned by the fixed thresholds.
    pub bucket: MarketCapBucket,
    /// Weighted composite score.
    pub composite_score: f64,
    /// Competition rank (1 = highest score; ties share a rank).
    pub rank: u32,
}
