//! Price series provider abstraction.

use cartera_primitives::Date;
use chrono::Duration;

/// Inclusive date window for a historical price request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First date of the window (inclusive).
    pub start: Date,
    /// Last date of the window (inclusive).
    pub end: Date,
}

impl DateWindow {
    /// Window ending at `end` and reaching `days` calendar days back.
    #[must_use]
    pub fn trailing_days(end: Date, days: i64) -> Self {
        Self { start: end - Duration::days(days), end }
    }

    /// Calendar days spanned, endpoints inclusive.
    #[must_use]
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Adjusted closing prices for one ticker, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// Ticker the prices belong to, without exchange suffix.
    pub symbol: String,
    /// `(date, adjusted close)` pairs, ascending by date.
    pub closes: Vec<(Date, f64)>,
}

/// Errors a price provider can produce.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The upstream request failed.
    #[error("price fetch failed for '{symbol}': {message}")]
    Fetch {
        /// Ticker that failed, with suffix.
        symbol: String,
        /// Upstream error message.
        message: String,
    },

    /// The provider answered but returned no quotes.
    #[error("no price history returned for '{symbol}'")]
    Empty {
        /// Ticker that came back empty, with suffix.
        symbol: String,
    },
}

/// Source of historical adjusted closing prices.
///
/// The analyzer appends the exchange `suffix` to `symbol` when forming the
/// upstream ticker; implementations decide what to do with it. Test
/// implementations usually ignore it.
pub trait PriceSeriesProvider {
    /// Fetch daily adjusted closes for `symbol` over `window`.
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the upstream request fails or comes
    /// back empty.
    fn history(
        &self,
        symbol: &str,
        suffix: &str,
        window: DateWindow,
    ) -> Result<PriceSeries, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_window_spans_requested_days() {
        let end = Date::from_ymd_opt(2024, 6, 30).unwrap();
        let window = DateWindow::trailing_days(end, 365);
        assert_eq!(window.end, end);
        assert_eq!(window.calendar_days(), 366);
        assert_eq!(window.start, Date::from_ymd_opt(2023, 7, 1).unwrap());
    }
}
